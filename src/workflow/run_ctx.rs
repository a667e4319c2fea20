//! 单平台运行上下文 - 流程层

use std::collections::HashSet;

use crate::models::{BlacklistSet, Listing, PlatformId};
use crate::services::report::ReportAggregator;

/// 运行范围内的 (公司, 岗位) 去重集合
///
/// 重试导致页面被重复访问时，同一岗位不会被投递第二次。
#[derive(Debug, Default)]
pub struct DedupeSet {
    seen: HashSet<(String, String)>,
}

impl DedupeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 首次出现返回 true 并记录，重复出现返回 false
    pub fn insert(&mut self, listing: &Listing) -> bool {
        self.seen.insert(listing.dedupe_key())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// 单平台单次运行的共享状态
///
/// 黑名单在运行开始时加载一次，运行期间只读；去重集合与报告
/// 只在本平台运行内使用，不跨平台共享。
pub struct RunCtx {
    pub platform: PlatformId,
    pub blacklist: BlacklistSet,
    pub dedupe: DedupeSet,
    pub report: ReportAggregator,
    pub greeting: String,
}

impl RunCtx {
    pub fn new(platform: PlatformId, blacklist: BlacklistSet, greeting: String) -> Self {
        Self {
            platform,
            blacklist,
            dedupe: DedupeSet::new(),
            report: ReportAggregator::new(),
            greeting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(company: &str, title: &str) -> Listing {
        Listing {
            title: title.to_string(),
            company: company.to_string(),
            recruiter: None,
            salary: None,
        }
    }

    #[test]
    fn second_identical_pair_is_rejected() {
        let mut dedupe = DedupeSet::new();
        assert!(dedupe.insert(&listing("Acme", "后端")));
        assert!(!dedupe.insert(&listing("Acme", "后端")));
        assert_eq!(dedupe.len(), 1);
    }

    #[test]
    fn dedupe_ignores_case() {
        let mut dedupe = DedupeSet::new();
        assert!(dedupe.insert(&listing("Acme", "Rust 工程师")));
        assert!(!dedupe.insert(&listing("ACME", "RUST 工程师")));
    }

    #[test]
    fn different_title_same_company_is_kept() {
        let mut dedupe = DedupeSet::new();
        assert!(dedupe.insert(&listing("Acme", "后端")));
        assert!(dedupe.insert(&listing("Acme", "前端")));
        assert_eq!(dedupe.len(), 2);
    }
}
