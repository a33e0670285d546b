use crate::cli::SyncParams;
use crate::config::ReporterKind;
use crate::download::{RunResult, build_http_client, sync_all};
use crate::error::GameSyncError;
use crate::progress::{NoopRenderer, PlainRenderer, ProgressLogRouter, TerminalDisplay};

/// Verifies every catalogued archive and fetches the ones that are missing or
/// corrupted.
///
/// Per-item failures do not make this return an error; inspect the returned
/// [`RunResult`] (or call [`RunResult::ensure_success`]).
pub async fn run_sync(params: SyncParams) -> Result<RunResult, GameSyncError> {
    let SyncParams {
        items,
        output_dir,
        options,
        reporter,
        request_timeout,
    } = params;

    std::fs::create_dir_all(&output_dir).map_err(|e| GameSyncError::DownloadDirectoryCreation {
        path: output_dir.clone(),
        reason: e.to_string(),
    })?;

    let client = build_http_client(request_timeout).map_err(GameSyncError::HttpClient)?;

    tracing::info!(
        "Syncing {} archives into {}",
        items.len(),
        output_dir.display()
    );

    let result = match reporter {
        ReporterKind::Terminal => {
            // Restores the terminal when this scope is left, however it is left.
            let display =
                TerminalDisplay::new(items.len()).route_logs(&ProgressLogRouter::global());
            sync_all(items, &client, options, display.renderer()).await?
        }
        ReporterKind::Plain => sync_all(items, &client, options, PlainRenderer::stdout()).await?,
        ReporterKind::Silent => sync_all(items, &client, options, NoopRenderer).await?,
    };

    Ok(result)
}

impl RunResult {
    /// Turns a run with failed items into [`GameSyncError::ItemsFailed`].
    pub fn ensure_success(&self) -> Result<(), GameSyncError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(GameSyncError::ItemsFailed {
                count: self.failed.len(),
                total: self.total,
                names: self.failed_names(),
            })
        }
    }
}
