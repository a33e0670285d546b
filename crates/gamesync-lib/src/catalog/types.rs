use crate::verification::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// One archive the run has to make sure is present and intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub name: Arc<str>,
    /// Where the archive lives on disk
    pub local_path: PathBuf,
    /// Where the archive is fetched from when the local copy is missing or stale
    pub remote_url: Url,
    pub expected_hash: Sha256Digest,
}

/// On-disk catalog document: `{"games": {"<name>": {"sha256": "<hex>"}}}`.
///
/// Entries may carry further fields; only the digest is read.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Catalog {
    pub games: BTreeMap<String, CatalogEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Where archives go locally and where they come from remotely.
#[derive(Clone, Debug)]
pub struct ArchiveLayout {
    pub destination: PathBuf,
    pub base_url: Url,
    pub extension: String,
}
