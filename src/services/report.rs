//! 投递报告聚合 - 业务能力层

use chrono::{DateTime, Local};
use tracing::info;

use crate::models::{Outcome, PlatformId, SubmissionRecord};
use crate::services::notify::Notifier;
use crate::utils::time::format_duration;

/// 单平台运行的投递记录聚合器
///
/// 记录在运行期间持续追加，finalize 在每次平台运行结束时恰好
/// 调用一次，统计、推送并清空缓冲，无论运行以何种方式结束。
#[derive(Debug)]
pub struct ReportAggregator {
    records: Vec<SubmissionRecord>,
    started_at: DateTime<Local>,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            started_at: Local::now(),
        }
    }

    /// 追加一条投递记录
    pub fn record(&mut self, record: SubmissionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    pub fn submitted_count(&self) -> usize {
        self.count(Outcome::Submitted)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// 统计本次运行并把摘要交给推送器，随后清空记录缓冲
    pub async fn finalize(&mut self, platform: PlatformId, notifier: &Notifier) -> String {
        let submitted = self.count(Outcome::Submitted);
        let skipped = self.count(Outcome::Skipped);
        let failed = self.count(Outcome::Failed);
        let elapsed = format_duration(self.started_at, Local::now());

        let mut summary = format!(
            "{}投递完成，共投递{}个岗位，跳过{}个，失败{}个，用时{}",
            platform.display_name(),
            submitted,
            skipped,
            failed,
            elapsed
        );
        let delivered: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.outcome == Outcome::Submitted)
            .map(|r| r.listing.describe())
            .collect();
        if !delivered.is_empty() {
            summary.push_str("\n新投递岗位如下:\n");
            summary.push_str(&delivered.join("\n"));
        }

        notifier.push(&summary).await;
        info!("[{}] 投递记录已汇总并清空", platform.display_name());
        self.records.clear();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;

    fn listing(company: &str, title: &str) -> Listing {
        Listing {
            title: title.to_string(),
            company: company.to_string(),
            recruiter: None,
            salary: None,
        }
    }

    #[tokio::test]
    async fn finalize_counts_and_clears() {
        let mut report = ReportAggregator::new();
        report.record(SubmissionRecord::submitted(listing("甲公司", "后端")));
        report.record(SubmissionRecord::submitted(listing("乙公司", "后端")));
        report.record(SubmissionRecord::skipped(listing("丙公司", "销售"), "命中黑名单岗位: 销售"));
        report.record(SubmissionRecord::failed(listing("丁公司", "后端"), "聊天窗口未出现"));
        assert_eq!(report.submitted_count(), 2);

        let notifier = Notifier::new(None);
        let summary = report.finalize(PlatformId::Liepin, &notifier).await;

        assert!(summary.contains("猎聘投递完成"));
        assert!(summary.contains("共投递2个岗位"));
        assert!(summary.contains("跳过1个"));
        assert!(summary.contains("失败1个"));
        assert!(summary.contains("【甲公司 后端】"));
        assert!(report.records().is_empty());
    }

    #[tokio::test]
    async fn empty_run_still_produces_summary() {
        let mut report = ReportAggregator::new();
        let notifier = Notifier::new(None);
        let summary = report.finalize(PlatformId::Zhilian, &notifier).await;
        assert!(summary.contains("智联招聘投递完成，共投递0个岗位"));
        assert!(!summary.contains("新投递岗位"));
    }
}
