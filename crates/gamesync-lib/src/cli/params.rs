use crate::catalog::ItemDescriptor;
use crate::config::ReporterKind;
use crate::download::SyncOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyncParams {
    pub items: Vec<ItemDescriptor>,
    pub output_dir: PathBuf,
    pub options: SyncOptions,
    pub reporter: ReporterKind,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct CheckParams {
    pub items: Vec<ItemDescriptor>,
    pub checking_parallelism: usize,
}
