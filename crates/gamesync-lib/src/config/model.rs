use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "games.json";
pub const DEFAULT_OUTPUT_DIR: &str = "bin";
pub const DEFAULT_BASE_URL: &str = "https://dos.zczc.cz/static/games/bin/";
pub const DEFAULT_EXTENSION: &str = "zip";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Live progress bars on the terminal
    #[default]
    Terminal,
    /// One line per progress event
    Plain,
    /// No progress output
    #[serde(rename = "none", alias = "silent")]
    #[value(name = "none", alias = "silent")]
    Silent,
}

/// Optional settings file. Every field can also be given on the command line,
/// which takes precedence.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub extension: Option<String>,
    pub reporter: Option<ReporterKind>,
    pub download_parallelism: Option<usize>,
    pub checking_parallelism: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub verify_downloads: Option<bool>,
}
