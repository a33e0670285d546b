use super::{ProgressCounters, ProgressError, ProgressEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Rendering target for progress events.
///
/// Renderers are driven by the reporter task only and receive the counters
/// as they stand after each event has been applied.
pub trait ProgressRenderer: Send {
    fn render(&mut self, event: &ProgressEvent, counters: &ProgressCounters);

    /// Called once when every item has been accounted for.
    fn finish(&mut self, counters: &ProgressCounters);

    /// Called instead of [`finish`](Self::finish) when the counters do not add up.
    fn abandon(&mut self, _counters: &ProgressCounters) {}
}

impl<R: ProgressRenderer + ?Sized> ProgressRenderer for Box<R> {
    fn render(&mut self, event: &ProgressEvent, counters: &ProgressCounters) {
        (**self).render(event, counters)
    }

    fn finish(&mut self, counters: &ProgressCounters) {
        (**self).finish(counters)
    }

    fn abandon(&mut self, counters: &ProgressCounters) {
        (**self).abandon(counters)
    }
}

/// Cheap, cloneable sender side used by units of work.
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressHandle {
    pub fn check_started(&self, name: &Arc<str>) {
        self.send(ProgressEvent::CheckStarted(name.clone()));
    }

    pub fn download_started(&self, name: &Arc<str>) {
        self.send(ProgressEvent::DownloadStarted(name.clone()));
    }

    pub fn download_finished(&self, name: &Arc<str>) {
        self.send(ProgressEvent::DownloadFinished(name.clone()));
    }

    pub fn item_done(&self, name: &Arc<str>) {
        self.send(ProgressEvent::ItemDone(name.clone()));
    }

    pub fn item_failed(&self, name: &Arc<str>, reason: impl ToString) {
        self.send(ProgressEvent::ItemFailed {
            name: name.clone(),
            reason: reason.to_string(),
        });
    }

    fn send(&self, event: ProgressEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::trace!("Progress reporter is gone, dropping event");
            return false;
        }
        true
    }
}

/// Owns the reporter task. Dropping it without calling
/// [`all_done`](Self::all_done) stops the task.
pub struct ProgressReporter {
    handle: ProgressHandle,
    task: Option<JoinHandle<Result<ProgressCounters, ProgressError>>>,
}

impl ProgressReporter {
    /// Starts the reporter task for a run of `total` items.
    pub fn spawn<R>(renderer: R, total: usize) -> Self
    where
        R: ProgressRenderer + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive_renderer(renderer, total, rx));
        Self {
            handle: ProgressHandle { tx },
            task: Some(task),
        }
    }

    pub fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    /// Signals that every unit of work has finished and waits for the
    /// reporter to drain its queue. Returns the final counters once they
    /// reconcile with the total.
    pub async fn all_done(mut self) -> Result<ProgressCounters, ProgressError> {
        let task = self.task.take().ok_or(ProgressError::ReporterGone)?;
        if !self.handle.send(ProgressEvent::AllDone) {
            return Err(ProgressError::ReporterGone);
        }
        task.await?
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn drive_renderer<R: ProgressRenderer>(
    mut renderer: R,
    total: usize,
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
) -> Result<ProgressCounters, ProgressError> {
    let mut counters = ProgressCounters::new(total);

    while let Some(event) = rx.recv().await {
        if event == ProgressEvent::AllDone {
            break;
        }
        counters.apply(&event);
        renderer.render(&event, &counters);
    }

    match counters.reconcile() {
        Ok(()) => {
            renderer.finish(&counters);
            Ok(counters)
        }
        Err(err) => {
            tracing::error!(?counters, "Progress counters do not reconcile");
            renderer.abandon(&counters);
            Err(err)
        }
    }
}
