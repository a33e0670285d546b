mod args;
mod check;
mod params;
mod resolved_command;
mod sync;

pub use args::{Args, CatalogArgs, Command, parse_args};
pub use check::run_check;
pub use params::{CheckParams, SyncParams};
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use sync::run_sync;
