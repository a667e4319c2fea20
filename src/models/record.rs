//! 投递记录

use chrono::{DateTime, Local};

use crate::models::listing::Listing;

/// 单条岗位的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 已投递
    Submitted,
    /// 被过滤或去重跳过
    Skipped,
    /// 交互重试耗尽仍失败
    Failed,
}

/// 一条投递记录，追加进本次运行的报告
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub listing: Listing,
    pub outcome: Outcome,
    pub reason: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl SubmissionRecord {
    pub fn submitted(listing: Listing) -> Self {
        Self {
            listing,
            outcome: Outcome::Submitted,
            reason: None,
            timestamp: Local::now(),
        }
    }

    pub fn skipped(listing: Listing, reason: impl Into<String>) -> Self {
        Self {
            listing,
            outcome: Outcome::Skipped,
            reason: Some(reason.into()),
            timestamp: Local::now(),
        }
    }

    pub fn failed(listing: Listing, reason: impl Into<String>) -> Self {
        Self {
            listing,
            outcome: Outcome::Failed,
            reason: Some(reason.into()),
            timestamp: Local::now(),
        }
    }
}
