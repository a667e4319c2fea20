pub mod pagination;
pub mod run_ctx;
pub mod submission;

pub use pagination::{PageReady, PaginationWalker, WalkBudget, WalkEnd};
pub use run_ctx::{DedupeSet, RunCtx};
pub use submission::{PageOutcome, RetryPolicy, SubmissionPipeline};
