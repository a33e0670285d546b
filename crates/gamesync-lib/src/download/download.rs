use super::fetch::fetch;
use super::types::{CheckResult, FailedItem, ItemOutcome, RunResult, SyncOptions};
use crate::catalog::ItemDescriptor;
use crate::error::ItemError;
use crate::progress::{ProgressError, ProgressHandle, ProgressRenderer, ProgressReporter};
use crate::verification::needs_download;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

struct WorkContext<'a> {
    client: &'a Client,
    checking: Semaphore,
    downloading: Semaphore,
    progress: ProgressHandle,
    verify_downloads: bool,
}

/// Makes sure every item is present locally with the expected content,
/// fetching whatever is missing or corrupted.
///
/// Items are processed concurrently; checks and downloads are bounded
/// separately by `options`. A failing item never stops the others: its error
/// is recorded in the returned [`RunResult`] and reported to the renderer.
/// The only error returned here is a progress report that does not add up.
pub async fn sync_all<R>(
    items: Vec<ItemDescriptor>,
    client: &Client,
    options: SyncOptions,
    renderer: R,
) -> Result<RunResult, ProgressError>
where
    R: ProgressRenderer + 'static,
{
    let total = items.len();
    let reporter = ProgressReporter::spawn(renderer, total);
    let ctx = WorkContext {
        client,
        checking: Semaphore::new(options.checking_parallelism),
        downloading: Semaphore::new(options.download_parallelism),
        progress: reporter.handle(),
        verify_downloads: options.verify_downloads,
    };

    info!(total, "Checking items...");

    let mut futs: FuturesUnordered<_> = items
        .into_iter()
        .map(|item| unit_of_work(item, &ctx))
        .collect();

    let mut result = RunResult::new(total);
    while let Some((name, outcome)) = futs.next().await {
        result.record(name, outcome);
    }
    drop(futs);
    result.sort_failures();

    let counters = reporter.all_done().await?;
    debug_assert_eq!(counters.done, result.downloaded + result.already_valid);

    for failure in &result.failed {
        warn!(name = %failure.name, "Failed: {:#}", failure.error);
    }
    info!(
        total = result.total,
        downloaded = result.downloaded,
        already_valid = result.already_valid,
        failed = result.failed.len(),
        "Finished"
    );

    Ok(result)
}

async fn unit_of_work(item: ItemDescriptor, ctx: &WorkContext<'_>) -> (Arc<str>, ItemOutcome) {
    let outcome = match check_then_fetch(&item, ctx).await {
        Ok(outcome) => outcome,
        Err(err) => {
            ctx.progress.item_failed(&item.name, &err);
            ItemOutcome::Failed(err)
        }
    };
    (item.name, outcome)
}

async fn check_then_fetch(
    item: &ItemDescriptor,
    ctx: &WorkContext<'_>,
) -> Result<ItemOutcome, ItemError> {
    let needs_fetch = {
        let _permit = ctx.checking.acquire().await?;
        ctx.progress.check_started(&item.name);
        needs_download(item).await?
    };

    if !needs_fetch {
        ctx.progress.item_done(&item.name);
        return Ok(ItemOutcome::AlreadyValid);
    }

    let _permit = ctx.downloading.acquire().await?;
    ctx.progress.download_started(&item.name);

    if let Some(parent) = item.local_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ItemError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    info!(name = %item.name, url = %item.remote_url, "Downloading");

    fetch(ctx.client, item, ctx.verify_downloads).await?;

    ctx.progress.download_finished(&item.name);
    ctx.progress.item_done(&item.name);
    Ok(ItemOutcome::Downloaded)
}

/// Runs only the integrity check for every item; nothing is fetched.
pub async fn check_all(items: Vec<ItemDescriptor>, checking_parallelism: usize) -> CheckResult {
    let checking = Semaphore::new(checking_parallelism);
    let mut result = CheckResult {
        total: items.len(),
        ..CheckResult::default()
    };

    let mut futs: FuturesUnordered<_> = items
        .into_iter()
        .map(|item| {
            let checking = &checking;
            async move {
                let needs = match checking.acquire().await {
                    Ok(_permit) => needs_download(&item).await,
                    Err(err) => Err(err.into()),
                };
                (item, needs)
            }
        })
        .collect();

    while let Some((item, needs)) = futs.next().await {
        match needs {
            Ok(false) => result.valid += 1,
            Ok(true) => {
                info!(name = %item.name, path = %item.local_path.display(), "Needs download");
                result.needs_download.push(item.name);
            }
            Err(error) => {
                warn!(name = %item.name, "Check failed: {error:#}");
                result.failed.push(FailedItem {
                    name: item.name,
                    error,
                });
            }
        }
    }
    drop(futs);

    result.needs_download.sort();
    result.failed.sort_by(|a, b| a.name.cmp(&b.name));
    result
}
