use eyre::Result;
use gamesync_lib::cli::{CatalogArgs, Command};
use gamesync_lib::config::ReporterKind;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// A scratch directory holding a catalog and the archive destination.
pub struct TestEnvironment {
    pub dir: TempDir,
    pub catalog_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestEnvironment {
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.zip"))
    }

    pub fn write_archive(&self, name: &str, content: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(self.archive_path(name), content)?;
        Ok(())
    }

    pub fn sync_command(&self, base_url: &str) -> Command {
        Command::Sync {
            catalog: CatalogArgs {
                config_path: None,
                catalog_path: Some(path_string(&self.catalog_path)),
                output_dir: Some(path_string(&self.output_dir)),
                base_url: Some(base_url.to_string()),
                extension: None,
            },
            reporter: Some(ReporterKind::Plain),
            download_parallelism: Some(4),
            checking_parallelism: None,
            request_timeout_secs: Some(10),
            verify_downloads: None,
        }
    }
}

/// Writes a catalog listing `games` as `(name, content the archive should have)`.
pub fn setup_test_environment(games: &[(&str, &[u8])]) -> Result<TestEnvironment> {
    let dir = tempfile::tempdir()?;

    let entries: serde_json::Map<String, serde_json::Value> = games
        .iter()
        .map(|(name, content)| {
            (
                name.to_string(),
                serde_json::json!({ "sha256": sha256_hex(content), "title": name }),
            )
        })
        .collect();
    let catalog_path = dir.path().join("games.json");
    std::fs::write(
        &catalog_path,
        serde_json::to_string_pretty(&serde_json::json!({ "games": entries }))?,
    )?;

    let output_dir = dir.path().join("bin");
    Ok(TestEnvironment {
        dir,
        catalog_path,
        output_dir,
    })
}

pub async fn serve_archive(server: &MockServer, name: &str, body: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/games/{name}.zip")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn fail_archive(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/games/{name}.zip")))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/games/", server.uri())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
