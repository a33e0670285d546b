use super::{ArchiveLayout, Catalog, ItemDescriptor};
use crate::utils::{archive_file_name, join_url_path, validate_item_name};
use crate::verification::{DigestParseError, Sha256Digest};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog entry {name} has no sha256 digest")]
    MissingDigest { name: String },

    #[error("Catalog entry {name} has an invalid sha256 digest: {source}")]
    InvalidDigest {
        name: String,
        #[source]
        source: DigestParseError,
    },

    #[error("Invalid item name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Cannot build a download URL for {name} from {base}")]
    InvalidItemUrl { name: String, base: String },

    #[error("Catalog entries {first} and {second} are both stored as {path}")]
    DuplicateArchive {
        first: String,
        second: String,
        path: PathBuf,
    },
}

pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the catalog at `path` and turns every entry into a descriptor.
///
/// Any invalid entry fails the whole load; nothing is checked or fetched
/// from a partially valid catalog.
pub fn load_catalog(
    path: &Path,
    layout: &ArchiveLayout,
) -> Result<Vec<ItemDescriptor>, CatalogError> {
    let catalog = read_catalog(path)?;
    let descriptors = catalog.descriptors(layout)?;
    tracing::debug!(
        catalog = %path.display(),
        items = descriptors.len(),
        "Loaded catalog"
    );
    Ok(descriptors)
}

impl Catalog {
    /// Derives one descriptor per entry. Two entries that would share an
    /// archive file (e.g. `doom.v1` and `doom.v2`) are rejected.
    pub fn descriptors(&self, layout: &ArchiveLayout) -> Result<Vec<ItemDescriptor>, CatalogError> {
        let mut claimed: HashMap<PathBuf, &str> = HashMap::with_capacity(self.games.len());
        let mut descriptors = Vec::with_capacity(self.games.len());

        for (name, entry) in &self.games {
            let hex_digest = entry
                .sha256
                .as_deref()
                .ok_or_else(|| CatalogError::MissingDigest { name: name.clone() })?;
            let expected_hash = Sha256Digest::from_hex(hex_digest).map_err(|source| {
                CatalogError::InvalidDigest {
                    name: name.clone(),
                    source,
                }
            })?;
            let descriptor = layout.descriptor(name, expected_hash)?;

            if let Some(first) = claimed.insert(descriptor.local_path.clone(), name.as_str()) {
                return Err(CatalogError::DuplicateArchive {
                    first: first.to_string(),
                    second: name.clone(),
                    path: descriptor.local_path,
                });
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}

impl ArchiveLayout {
    pub fn new(
        destination: impl Into<PathBuf>,
        base_url: &str,
        extension: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_string()));
        }

        Ok(Self {
            destination: destination.into(),
            base_url: parsed,
            extension: extension.into(),
        })
    }

    pub fn descriptor(
        &self,
        name: &str,
        expected_hash: Sha256Digest,
    ) -> Result<ItemDescriptor, CatalogError> {
        validate_item_name(name).map_err(|reason| CatalogError::InvalidName {
            name: name.to_string(),
            reason,
        })?;

        let file_name = archive_file_name(name, &self.extension);
        let remote_url =
            join_url_path(&self.base_url, &file_name).ok_or_else(|| CatalogError::InvalidItemUrl {
                name: name.to_string(),
                base: self.base_url.to_string(),
            })?;

        Ok(ItemDescriptor {
            name: Arc::from(name),
            local_path: self.destination.join(&file_name),
            remote_url,
            expected_hash,
        })
    }
}
