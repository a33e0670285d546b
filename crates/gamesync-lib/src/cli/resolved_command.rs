use crate::catalog::{ArchiveLayout, ItemDescriptor, load_catalog};
use crate::cli::args::{CatalogArgs, Command};
use crate::cli::params::{CheckParams, SyncParams};
use crate::config::{
    Config, DEFAULT_BASE_URL, DEFAULT_CATALOG_PATH, DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR,
    load_config,
};
use crate::download::SyncOptions;
use crate::error::GameSyncError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Sync(SyncParams),
    Check(CheckParams),
}

/// Merges command-line arguments, the optional settings file and built-in
/// defaults (in that order of precedence), then loads the catalog.
///
/// Every configuration problem, including a bad catalog entry, is reported
/// here before any file is checked or fetched.
pub fn resolve_command(command: Command) -> Result<ResolvedCommand, GameSyncError> {
    match command {
        Command::Sync {
            catalog,
            reporter,
            download_parallelism,
            checking_parallelism,
            request_timeout_secs,
            verify_downloads,
        } => {
            let settings = load_settings(&catalog)?;
            let defaults = SyncOptions::default();

            let download_parallelism = download_parallelism
                .or(settings.download_parallelism)
                .unwrap_or(defaults.download_parallelism);
            let checking_parallelism = checking_parallelism
                .or(settings.checking_parallelism)
                .unwrap_or(defaults.checking_parallelism);
            let request_timeout_secs = request_timeout_secs.or(settings.request_timeout_secs);

            ensure_positive(&[
                ("download-parallelism", download_parallelism as u64),
                ("checking-parallelism", checking_parallelism as u64),
                ("request-timeout", request_timeout_secs.unwrap_or(1)),
            ])?;

            let (items, output_dir) = resolve_items(&catalog, &settings)?;

            Ok(ResolvedCommand::Sync(SyncParams {
                items,
                output_dir,
                options: SyncOptions {
                    download_parallelism,
                    checking_parallelism,
                    verify_downloads: verify_downloads
                        .or(settings.verify_downloads)
                        .unwrap_or(defaults.verify_downloads),
                },
                reporter: reporter.or(settings.reporter).unwrap_or_default(),
                request_timeout: request_timeout_secs.map(Duration::from_secs),
            }))
        }
        Command::Check {
            catalog,
            checking_parallelism,
        } => {
            let settings = load_settings(&catalog)?;
            let checking_parallelism = checking_parallelism
                .or(settings.checking_parallelism)
                .unwrap_or(SyncOptions::default().checking_parallelism);
            ensure_positive(&[("checking-parallelism", checking_parallelism as u64)])?;

            let (items, _output_dir) = resolve_items(&catalog, &settings)?;

            Ok(ResolvedCommand::Check(CheckParams {
                items,
                checking_parallelism,
            }))
        }
    }
}

fn load_settings(args: &CatalogArgs) -> Result<Config, GameSyncError> {
    match &args.config_path {
        Some(config_path) => {
            tracing::info!("Loading settings from {}", config_path);
            load_config(config_path)
        }
        None => Ok(Config::default()),
    }
}

fn ensure_positive(values: &[(&str, u64)]) -> Result<(), GameSyncError> {
    for (name, value) in values {
        if *value == 0 {
            return Err(GameSyncError::CliArgumentValidation {
                details: format!("{name} must be greater than 0."),
            });
        }
    }
    Ok(())
}

fn resolve_items(
    args: &CatalogArgs,
    settings: &Config,
) -> Result<(Vec<ItemDescriptor>, PathBuf), GameSyncError> {
    let catalog_path = args
        .catalog_path
        .clone()
        .map(PathBuf::from)
        .or_else(|| settings.catalog_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
    let output_dir = args
        .output_dir
        .clone()
        .map(PathBuf::from)
        .or_else(|| settings.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let base_url = args
        .base_url
        .as_deref()
        .or(settings.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL);
    let extension = args
        .extension
        .as_deref()
        .or(settings.extension.as_deref())
        .unwrap_or(DEFAULT_EXTENSION);

    if extension.trim_start_matches('.').is_empty() {
        return Err(GameSyncError::CliArgumentValidation {
            details: "extension must not be empty.".to_string(),
        });
    }

    let layout = ArchiveLayout::new(output_dir.clone(), base_url, extension)?;

    tracing::info!("Loading catalog from {}", catalog_path.display());
    let items = load_catalog(&catalog_path, &layout)?;

    Ok((items, output_dir))
}
