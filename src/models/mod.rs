pub mod blacklist;
pub mod cookie;
pub mod listing;
pub mod platform;
pub mod record;

pub use blacklist::BlacklistSet;
pub use cookie::CookieRecord;
pub use listing::Listing;
pub use platform::{parse_platform_args, PlatformId};
pub use record::{Outcome, SubmissionRecord};
