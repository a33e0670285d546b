use gamesync_e2e_tests::{
    base_url, fail_archive, serve_archive, setup_test_environment, sha256_hex,
};
use gamesync_lib::cli::{
    CatalogArgs, Command, ResolvedCommand, SyncParams, resolve_command, run_check, run_sync,
};
use gamesync_lib::error::{GameSyncError, ItemError};
use wiremock::MockServer;

const PONG: &[u8] = b"PK\x03\x04pong.exe";
const DOOM: &[u8] = b"PK\x03\x04doom.exe";
const KEEN: &[u8] = b"PK\x03\x04keen.exe";

fn sync_params(command: Command) -> SyncParams {
    match resolve_command(command).expect("Failed to resolve sync command") {
        ResolvedCommand::Sync(params) => params,
        _ => unreachable!("Resolved command type mismatch"),
    }
}

#[tokio::test]
async fn test_missing_archive_is_downloaded() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "pong", PONG, 1).await;
    let env = setup_test_environment(&[("pong", PONG)]).unwrap();

    let result = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Sync should succeed");

    assert_eq!(result.total, 1);
    assert_eq!(result.downloaded, 1);
    assert!(result.ensure_success().is_ok());
    let written = std::fs::read(env.archive_path("pong")).unwrap();
    assert_eq!(sha256_hex(&written), sha256_hex(PONG));
}

#[tokio::test]
async fn test_valid_archive_is_left_alone() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "pong", PONG, 0).await;
    let env = setup_test_environment(&[("pong", PONG)]).unwrap();
    env.write_archive("pong", PONG).unwrap();

    let result = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Sync should succeed");

    assert_eq!(result.already_valid, 1);
    assert_eq!(result.downloaded, 0);
}

#[tokio::test]
async fn test_corrupted_archive_is_replaced() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "pong", PONG, 1).await;
    let env = setup_test_environment(&[("pong", PONG)]).unwrap();
    env.write_archive("pong", b"PK\x03\x04pong.ex").unwrap();

    let result = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Sync should succeed");

    assert_eq!(result.downloaded, 1);
    assert_eq!(std::fs::read(env.archive_path("pong")).unwrap(), PONG);
}

#[tokio::test]
async fn test_network_failure_is_reported_per_item() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "pong", PONG, 1).await;
    serve_archive(&server, "keen", KEEN, 1).await;
    fail_archive(&server, "doom", 500).await;
    let env = setup_test_environment(&[("pong", PONG), ("doom", DOOM), ("keen", KEEN)]).unwrap();

    let result = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Per-item failures should not fail the run itself");

    assert_eq!(result.failed_names(), vec!["doom".to_string()]);
    assert!(matches!(result.failed[0].error, ItemError::Network { .. }));
    assert_eq!(result.downloaded, 2);
    assert!(env.archive_path("pong").exists());
    assert!(env.archive_path("keen").exists());

    match result.ensure_success() {
        Err(GameSyncError::ItemsFailed { count, total, names }) => {
            assert_eq!(count, 1);
            assert_eq!(total, 3);
            assert_eq!(names, vec!["doom".to_string()]);
        }
        other => panic!("Expected ItemsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_catalog_completes() {
    init_tracing();
    let server = MockServer::start().await;
    let env = setup_test_environment(&[]).unwrap();

    let result = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Sync should succeed");

    assert_eq!(result.total, 0);
    assert!(result.ensure_success().is_ok());
    assert!(env.output_dir.is_dir(), "Destination should be created up front");
}

#[tokio::test]
async fn test_second_sync_downloads_nothing() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "pong", PONG, 1).await;
    serve_archive(&server, "doom", DOOM, 1).await;
    let env = setup_test_environment(&[("pong", PONG), ("doom", DOOM)]).unwrap();

    let first = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("First sync should succeed");
    let second = run_sync(sync_params(env.sync_command(&base_url(&server))))
        .await
        .expect("Second sync should succeed");

    assert_eq!(first.downloaded, 2);
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.already_valid, 2);
}

#[tokio::test]
async fn test_check_reports_without_downloading() {
    init_tracing();
    let server = MockServer::start().await;
    serve_archive(&server, "doom", DOOM, 0).await;
    let env = setup_test_environment(&[("pong", PONG), ("doom", DOOM)]).unwrap();
    env.write_archive("pong", PONG).unwrap();

    let command = Command::Check {
        catalog: CatalogArgs {
            catalog_path: Some(env.catalog_path.to_string_lossy().into_owned()),
            output_dir: Some(env.output_dir.to_string_lossy().into_owned()),
            base_url: Some(base_url(&server)),
            ..CatalogArgs::default()
        },
        checking_parallelism: None,
    };
    let ResolvedCommand::Check(params) = resolve_command(command).unwrap() else {
        unreachable!("Resolved command type mismatch");
    };

    let result = run_check(params).await.unwrap();

    assert_eq!(result.valid, 1);
    assert_eq!(result.needs_download.len(), 1);
    assert_eq!(&*result.needs_download[0], "doom");
    assert!(matches!(
        result.ensure_complete(),
        Err(GameSyncError::Incomplete {
            needs_download: 1,
            failed: 0
        })
    ));
    assert!(!env.archive_path("doom").exists());
}

#[tokio::test]
async fn test_catalog_with_bad_digest_is_rejected_up_front() {
    init_tracing();
    let server = MockServer::start().await;
    let env = setup_test_environment(&[]).unwrap();
    std::fs::write(
        &env.catalog_path,
        r#"{"games": {"pong": {"sha256": "abc"}}}"#,
    )
    .unwrap();

    let err = resolve_command(env.sync_command(&base_url(&server))).unwrap_err();

    assert!(matches!(err, GameSyncError::Catalog(_)), "{err:?}");
    assert!(!env.output_dir.exists(), "Nothing should be touched");
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("gamesync_lib=debug,gamesync_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
