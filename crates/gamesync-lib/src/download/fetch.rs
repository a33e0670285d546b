use crate::catalog::ItemDescriptor;
use crate::error::ItemError;
use crate::verification::ContentDigestVerifier;
use reqwest::Client;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

pub fn build_http_client(request_timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Downloads `item.remote_url` into `item.local_path`, returning the number
/// of bytes written.
///
/// Each received chunk is written to the file as it arrives, without an
/// intermediate write buffer, and the file is synced before success is
/// reported. A failed download may leave a partial file behind. When `verify`
/// is set the body must hash to `item.expected_hash`.
pub async fn fetch(client: &Client, item: &ItemDescriptor, verify: bool) -> Result<u64, ItemError> {
    let url = &item.remote_url;
    let path = &item.local_path;
    let write_error = |source: std::io::Error| ItemError::Write {
        path: path.clone(),
        source,
    };

    let mut response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ItemError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ItemError::network(url, format!("HTTP status {status}")));
    }

    let mut file = tokio::fs::File::create(path).await.map_err(write_error)?;
    let mut verifier = verify.then(|| ContentDigestVerifier::new(item.expected_hash));
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ItemError::network(url, e))?
    {
        if let Some(verifier) = verifier.as_mut() {
            verifier.update(&chunk);
        }
        file.write_all(&chunk).await.map_err(write_error)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(write_error)?;
    file.sync_all().await.map_err(write_error)?;

    if let Some(verifier) = verifier {
        verifier.verify().map_err(|source| ItemError::Verification {
            path: path.clone(),
            source,
        })?;
    }

    tracing::debug!(name = %item.name, url = %url, path = %path.display(), bytes = written, "Fetched");
    Ok(written)
}
