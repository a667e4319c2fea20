//! 时间格式化辅助

use chrono::{DateTime, Local};

/// 把起止时间差格式化为可读文本
pub fn format_duration(start: DateTime<Local>, end: DateTime<Local>) -> String {
    let total_secs = (end - start).num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = total_secs % 3600 / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}小时{}分{}秒", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}分{}秒", minutes, seconds)
    } else {
        format!("{}秒", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn seconds_only() {
        let start = Local::now();
        assert_eq!(format_duration(start, start + Duration::seconds(42)), "42秒");
    }

    #[test]
    fn minutes_and_seconds() {
        let start = Local::now();
        assert_eq!(
            format_duration(start, start + Duration::seconds(125)),
            "2分5秒"
        );
    }

    #[test]
    fn hours_minutes_seconds() {
        let start = Local::now();
        assert_eq!(
            format_duration(start, start + Duration::seconds(3661)),
            "1小时1分1秒"
        );
    }

    #[test]
    fn negative_clamps_to_zero() {
        let start = Local::now();
        assert_eq!(format_duration(start, start - Duration::seconds(5)), "0秒");
    }
}
