pub mod auth;
pub mod filter;
pub mod notify;
pub mod report;
pub mod selector;

pub use auth::{AuthController, AuthState, CredentialStore};
pub use filter::{FilterEngine, SkipReason};
pub use notify::Notifier;
pub use report::ReportAggregator;
pub use selector::{CascadeMatch, CascadeScope, SelectorCascade};
