pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod progress;
pub mod utils;
pub mod verification;

pub use config::Config;
pub use error::{GameSyncError, ItemError};
