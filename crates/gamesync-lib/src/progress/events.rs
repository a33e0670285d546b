use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The local copy of an item is being examined
    CheckStarted(Arc<str>),
    DownloadStarted(Arc<str>),
    DownloadFinished(Arc<str>),
    /// The item is present and intact
    ItemDone(Arc<str>),
    ItemFailed { name: Arc<str>, reason: String },
    /// Every unit of work has reached a terminal state
    AllDone,
}

impl ProgressEvent {
    pub fn name(&self) -> Option<&str> {
        match self {
            ProgressEvent::CheckStarted(name)
            | ProgressEvent::DownloadStarted(name)
            | ProgressEvent::DownloadFinished(name)
            | ProgressEvent::ItemDone(name)
            | ProgressEvent::ItemFailed { name, .. } => Some(&**name),
            ProgressEvent::AllDone => None,
        }
    }
}
