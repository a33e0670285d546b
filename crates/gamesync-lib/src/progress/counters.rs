use super::ProgressEvent;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Progress does not add up: {done} done and {failed} failed out of {total}")]
    InconsistentProgress {
        total: usize,
        done: usize,
        failed: usize,
    },

    #[error("Progress reporter task failed: {0}")]
    ReporterTask(#[from] tokio::task::JoinError),

    #[error("Progress reporter stopped before the run finished")]
    ReporterGone,
}

/// Aggregate progress of a run. Counters only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressCounters {
    pub total: usize,
    pub checked: usize,
    /// Downloads started so far
    pub downloading: usize,
    pub downloaded: usize,
    pub done: usize,
    pub failed: usize,
}

impl ProgressCounters {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::CheckStarted(_) => self.checked += 1,
            ProgressEvent::DownloadStarted(_) => self.downloading += 1,
            ProgressEvent::DownloadFinished(_) => self.downloaded += 1,
            ProgressEvent::ItemDone(_) => self.done += 1,
            ProgressEvent::ItemFailed { .. } => self.failed += 1,
            ProgressEvent::AllDone => {}
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.done == self.total
    }

    /// Every item must have ended up either done or failed.
    pub fn reconcile(&self) -> Result<(), ProgressError> {
        if self.done + self.failed == self.total {
            Ok(())
        } else {
            Err(ProgressError::InconsistentProgress {
                total: self.total,
                done: self.done,
                failed: self.failed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_apply_counts_each_event_kind() {
        let name: Arc<str> = Arc::from("pong");
        let mut counters = ProgressCounters::new(2);

        for event in [
            ProgressEvent::CheckStarted(name.clone()),
            ProgressEvent::DownloadStarted(name.clone()),
            ProgressEvent::DownloadFinished(name.clone()),
            ProgressEvent::ItemDone(name.clone()),
            ProgressEvent::CheckStarted(name.clone()),
            ProgressEvent::ItemFailed {
                name: name.clone(),
                reason: "boom".to_string(),
            },
            ProgressEvent::AllDone,
        ] {
            counters.apply(&event);
        }

        assert_eq!(
            counters,
            ProgressCounters {
                total: 2,
                checked: 2,
                downloading: 1,
                downloaded: 1,
                done: 1,
                failed: 1,
            }
        );
        assert!(counters.reconcile().is_ok());
        assert!(!counters.all_succeeded());
    }

    #[test]
    fn test_reconcile_detects_missing_items() {
        let mut counters = ProgressCounters::new(3);
        counters.apply(&ProgressEvent::ItemDone(Arc::from("pong")));

        let err = counters.reconcile().unwrap_err();
        assert!(matches!(
            err,
            ProgressError::InconsistentProgress {
                total: 3,
                done: 1,
                failed: 0
            }
        ));
    }

    #[test]
    fn test_empty_run_reconciles() {
        let counters = ProgressCounters::new(0);
        assert!(counters.reconcile().is_ok());
        assert!(counters.all_succeeded());
    }
}
