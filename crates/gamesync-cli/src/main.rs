use gamesync_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_check, run_sync};
use gamesync_lib::error::GameSyncError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), GameSyncError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    // Dropping the running command on Ctrl-C tears down the progress display.
    tokio::select! {
        result = run(command) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, stopping");
            Err(GameSyncError::Interrupted)
        }
    }
}

async fn run(command: ResolvedCommand) -> Result<(), GameSyncError> {
    match command {
        ResolvedCommand::Sync(params) => run_sync(params).await?.ensure_success()?,
        ResolvedCommand::Check(params) => run_check(params).await?.ensure_complete()?,
    }

    Ok(())
}
