use crate::cli::CheckParams;
use crate::download::{CheckResult, check_all};
use crate::error::GameSyncError;

/// Checks every catalogued archive without fetching anything and prints the
/// names of the archives a sync would download.
pub async fn run_check(params: CheckParams) -> Result<CheckResult, GameSyncError> {
    let CheckParams {
        items,
        checking_parallelism,
    } = params;

    tracing::info!("Checking {} archives...", items.len());
    let result = check_all(items, checking_parallelism).await;

    for name in &result.needs_download {
        println!("{name}");
    }

    tracing::info!(
        total = result.total,
        valid = result.valid,
        needs_download = result.needs_download.len(),
        failed = result.failed.len(),
        "Check finished"
    );
    Ok(result)
}

impl CheckResult {
    /// Turns a check that found missing, stale or unreadable archives into
    /// [`GameSyncError::Incomplete`].
    pub fn ensure_complete(&self) -> Result<(), GameSyncError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(GameSyncError::Incomplete {
                needs_download: self.needs_download.len(),
                failed: self.failed.len(),
            })
        }
    }
}
