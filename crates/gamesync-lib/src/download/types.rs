use crate::error::ItemError;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    pub download_parallelism: usize,
    pub checking_parallelism: usize,
    /// Hash downloaded content and fail the item if it does not match
    pub verify_downloads: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            download_parallelism: 16,
            checking_parallelism: 128,
            verify_downloads: true,
        }
    }
}

#[derive(Debug)]
pub enum ItemOutcome {
    AlreadyValid,
    Downloaded,
    Failed(ItemError),
}

#[derive(Debug)]
pub struct FailedItem {
    pub name: Arc<str>,
    pub error: ItemError,
}

/// Summary of a sync run. `failed` is sorted by item name.
#[derive(Debug, Default)]
pub struct RunResult {
    pub total: usize,
    pub downloaded: usize,
    pub already_valid: usize,
    pub failed: Vec<FailedItem>,
}

impl RunResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, name: Arc<str>, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::AlreadyValid => self.already_valid += 1,
            ItemOutcome::Downloaded => self.downloaded += 1,
            ItemOutcome::Failed(error) => self.failed.push(FailedItem { name, error }),
        }
    }

    pub(crate) fn sort_failures(&mut self) {
        self.failed.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn processed(&self) -> usize {
        self.downloaded + self.already_valid + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.name.to_string()).collect()
    }
}

/// Summary of a check-only run. Both lists are sorted by item name.
#[derive(Debug, Default)]
pub struct CheckResult {
    pub total: usize,
    pub valid: usize,
    pub needs_download: Vec<Arc<str>>,
    pub failed: Vec<FailedItem>,
}

impl CheckResult {
    pub fn is_complete(&self) -> bool {
        self.needs_download.is_empty() && self.failed.is_empty()
    }
}
