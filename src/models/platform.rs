//! 平台标识

use std::fmt;
use std::str::FromStr;

/// 支持的招聘平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Job51,
    Zhilian,
    Liepin,
}

impl PlatformId {
    /// 全部平台，按执行顺序排列
    pub const ALL: [PlatformId; 3] = [PlatformId::Job51, PlatformId::Zhilian, PlatformId::Liepin];

    /// 平台短名，用于命令行参数和数据文件目录
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Job51 => "job51",
            PlatformId::Zhilian => "zhilian",
            PlatformId::Liepin => "liepin",
        }
    }

    /// 报告里使用的平台名称
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformId::Job51 => "51job",
            PlatformId::Zhilian => "智联招聘",
            PlatformId::Liepin => "猎聘",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "job51" | "51job" => Ok(PlatformId::Job51),
            "zhilian" => Ok(PlatformId::Zhilian),
            "liepin" => Ok(PlatformId::Liepin),
            other => Err(format!("未知的平台参数: {}", other)),
        }
    }
}

/// 解析命令行平台参数
///
/// 无参数或包含 all 时运行全部平台；无法识别的参数只告警不中断。
pub fn parse_platform_args(args: &[String]) -> Vec<PlatformId> {
    if args.is_empty() || args.iter().any(|a| a.eq_ignore_ascii_case("all")) {
        return PlatformId::ALL.to_vec();
    }

    let mut picked = Vec::new();
    for arg in args {
        match arg.parse::<PlatformId>() {
            Ok(id) => {
                if !picked.contains(&id) {
                    picked.push(id);
                }
            }
            Err(msg) => tracing::warn!("{}", msg),
        }
    }

    if picked.is_empty() {
        tracing::warn!("没有提供有效的平台参数，将运行所有平台");
        return PlatformId::ALL.to_vec();
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_platforms() {
        assert_eq!("liepin".parse::<PlatformId>().unwrap(), PlatformId::Liepin);
        assert_eq!("ZHILIAN".parse::<PlatformId>().unwrap(), PlatformId::Zhilian);
        assert_eq!("51job".parse::<PlatformId>().unwrap(), PlatformId::Job51);
        assert!("lagou".parse::<PlatformId>().is_err());
    }

    #[test]
    fn empty_args_select_all() {
        assert_eq!(parse_platform_args(&[]), PlatformId::ALL.to_vec());
    }

    #[test]
    fn all_keyword_selects_all() {
        let args = vec!["liepin".to_string(), "ALL".to_string()];
        assert_eq!(parse_platform_args(&args), PlatformId::ALL.to_vec());
    }

    #[test]
    fn explicit_args_preserve_order_and_dedupe() {
        let args = vec![
            "zhilian".to_string(),
            "liepin".to_string(),
            "zhilian".to_string(),
        ];
        assert_eq!(
            parse_platform_args(&args),
            vec![PlatformId::Zhilian, PlatformId::Liepin]
        );
    }

    #[test]
    fn invalid_args_fall_back_to_all() {
        let args = vec!["lagou".to_string()];
        assert_eq!(parse_platform_args(&args), PlatformId::ALL.to_vec());
    }
}
