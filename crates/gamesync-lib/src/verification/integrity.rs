use super::Sha256Digest;
use super::content_digest_hasher::hash_in_place;
use crate::catalog::ItemDescriptor;
use crate::error::ItemError;
use digest::Digest;
use sha2::Sha256;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Decides whether `item` has to be fetched.
///
/// A missing file (or a path that is not a regular file) needs a download. An
/// existing file is hashed in full and needs a download only if its digest
/// differs from the expected one. Read failures on an existing file are
/// returned as [`ItemError::FileRead`] rather than treated as either outcome.
pub async fn needs_download(item: &ItemDescriptor) -> Result<bool, ItemError> {
    let path = item.local_path.as_path();

    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => {
            tracing::debug!(name = %item.name, path = %path.display(), "Not a regular file, will download");
            return Ok(true);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::trace!(name = %item.name, path = %path.display(), "File missing");
            return Ok(true);
        }
        Err(source) => {
            return Err(ItemError::FileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let actual = hash_file(path).await.map_err(|source| ItemError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mismatch = actual != item.expected_hash;
    if mismatch {
        tracing::info!(
            name = %item.name,
            path = %path.display(),
            expected = %item.expected_hash,
            actual = %actual,
            "File exists with incorrect digest"
        );
    } else {
        tracing::debug!(name = %item.name, path = %path.display(), "File exists with matching digest");
    }
    Ok(mismatch)
}

/// Computes the SHA-256 digest of a file, reading it in chunks.
pub async fn hash_file(path: impl AsRef<Path>) -> std::io::Result<Sha256Digest> {
    let mut file = tokio::fs::File::open(path.as_ref()).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hash_in_place(|| Digest::update(&mut hasher, &buffer[..bytes_read]));
    }

    Ok(Sha256Digest::from_hasher(hasher))
}
