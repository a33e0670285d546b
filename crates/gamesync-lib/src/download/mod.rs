#[allow(clippy::module_inception)]
mod download;
mod fetch;
mod types;

pub use download::{check_all, sync_all};
pub use fetch::{build_http_client, fetch};
pub use types::{CheckResult, FailedItem, ItemOutcome, RunResult, SyncOptions};
