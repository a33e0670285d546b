use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::progress::ProgressError;

#[derive(Error, Debug)]
pub enum GameSyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Download directory creation failed at {path}: {reason}")]
    DownloadDirectoryCreation { path: PathBuf, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Progress reporting failed: {0}")]
    Progress(#[from] ProgressError),

    #[error("{count} of {total} items failed: {}", .names.join(", "))]
    ItemsFailed {
        count: usize,
        total: usize,
        names: Vec<String>,
    },

    #[error("{needs_download} items need a download and {failed} could not be checked")]
    Incomplete { needs_download: usize, failed: usize },

    #[error("Interrupted before all items finished")]
    Interrupted,

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

/// Failure of a single unit of work. Never aborts sibling items.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Downloaded content of {path} does not match: {source}")]
    Verification {
        path: PathBuf,
        #[source]
        source: crate::verification::VerificationError,
    },

    #[error("Work pool shut down before the item was processed")]
    Interrupted(#[from] tokio::sync::AcquireError),
}

impl ItemError {
    pub fn network(url: &url::Url, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
