//! 黑名单过滤 - 业务能力层
//!
//! 投递前的强制检查，任何路径都不允许绕过。纯函数，不做任何 IO。

use std::fmt;

use crate::models::{BlacklistSet, Listing};

/// 命中黑名单的原因，写入投递记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Company(String),
    JobTitle(String),
    Recruiter(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Company(hit) => write!(f, "命中黑名单公司: {}", hit),
            SkipReason::JobTitle(hit) => write!(f, "命中黑名单岗位: {}", hit),
            SkipReason::Recruiter(hit) => write!(f, "命中黑名单招聘者: {}", hit),
        }
    }
}

/// 黑名单过滤引擎
pub struct FilterEngine;

impl FilterEngine {
    /// 大小写不敏感的包含匹配，任一字段命中即跳过
    ///
    /// 黑名单词条在加载时已转为小写，这里只需把岗位字段转小写。
    pub fn skip_reason(listing: &Listing, blacklist: &BlacklistSet) -> Option<SkipReason> {
        let company = listing.company.to_lowercase();
        if let Some(hit) = blacklist.companies.iter().find(|b| company.contains(b.as_str())) {
            return Some(SkipReason::Company(hit.clone()));
        }

        let title = listing.title.to_lowercase();
        if let Some(hit) = blacklist.job_titles.iter().find(|b| title.contains(b.as_str())) {
            return Some(SkipReason::JobTitle(hit.clone()));
        }

        if let Some(recruiter) = &listing.recruiter {
            let recruiter = recruiter.to_lowercase();
            if let Some(hit) = blacklist.recruiters.iter().find(|b| recruiter.contains(b.as_str())) {
                return Some(SkipReason::Recruiter(hit.clone()));
            }
        }
        None
    }

    /// 是否应当跳过该岗位
    pub fn should_skip(listing: &Listing, blacklist: &BlacklistSet) -> bool {
        Self::skip_reason(listing, blacklist).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist() -> BlacklistSet {
        let mut set = BlacklistSet::default();
        set.companies.insert("acme".to_string());
        set.job_titles.insert("销售".to_string());
        set.recruiters.insert("猎头".to_string());
        set
    }

    fn listing(company: &str, title: &str) -> Listing {
        Listing {
            title: title.to_string(),
            company: company.to_string(),
            recruiter: None,
            salary: None,
        }
    }

    #[test]
    fn company_match_is_case_insensitive_containment() {
        let l = listing("ACME Corp", "Engineer");
        assert!(FilterEngine::should_skip(&l, &blacklist()));
        assert_eq!(
            FilterEngine::skip_reason(&l, &blacklist()),
            Some(SkipReason::Company("acme".to_string()))
        );
    }

    #[test]
    fn title_substring_hits() {
        let l = listing("好公司", "电话销售专员");
        assert!(matches!(
            FilterEngine::skip_reason(&l, &blacklist()),
            Some(SkipReason::JobTitle(_))
        ));
    }

    #[test]
    fn recruiter_checked_only_when_present() {
        let mut l = listing("好公司", "工程师");
        assert!(!FilterEngine::should_skip(&l, &blacklist()));

        l.recruiter = Some("某猎头顾问".to_string());
        assert!(matches!(
            FilterEngine::skip_reason(&l, &blacklist()),
            Some(SkipReason::Recruiter(_))
        ));
    }

    #[test]
    fn clean_listing_passes() {
        let l = listing("正经公司", "Rust 工程师");
        assert!(!FilterEngine::should_skip(&l, &blacklist()));
    }

    #[test]
    fn empty_blacklist_never_skips() {
        let l = listing("ACME Corp", "销售");
        assert!(!FilterEngine::should_skip(&l, &BlacklistSet::default()));
    }
}
