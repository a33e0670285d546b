//! Progress reporting for a sync run.
//!
//! Units of work send [`ProgressEvent`]s through a cloneable
//! [`ProgressHandle`]. A single reporter task owns the
//! [`ProgressCounters`] and forwards every event to a
//! [`ProgressRenderer`], so counter updates are never lost no matter how
//! many units report at once.

mod counters;
mod events;
mod log_router;
mod plain;
mod reporter;
mod terminal;

pub use counters::{ProgressCounters, ProgressError};
pub use events::ProgressEvent;
pub use log_router::{LogLine, ProgressLogRouter};
pub use plain::{NoopRenderer, PlainRenderer};
pub use reporter::{ProgressHandle, ProgressRenderer, ProgressReporter};
pub use terminal::{TerminalDisplay, TerminalRenderer};
