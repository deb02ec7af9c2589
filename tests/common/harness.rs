//! A complete run environment: one mock server standing in for every vendor,
//! a temporary download directory and a SQLite molecule table.

use oe_find_sds::{Config, Database, MoleculeStore, SdsFinder, SourcesConfig};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};
use wiremock::MockServer;

const CREATE_MOLECULE_TABLE: &str = r#"
    CREATE TABLE molecule (
        molecule_id INTEGER PRIMARY KEY,
        cas_nr TEXT NOT NULL DEFAULT '',
        default_safety_sheet_blob BLOB,
        default_safety_sheet_by TEXT,
        default_safety_sheet_url TEXT,
        default_safety_sheet_mime TEXT
    )
"#;

/// Test environment for one run
pub struct TestEnv {
    /// Mock server answering for every vendor site
    pub server: MockServer,
    /// Molecule database
    pub db: Arc<Database>,
    download_dir: TempDir,
    _db_file: NamedTempFile,
}

impl TestEnv {
    /// Start the mock server and create an empty molecule table
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let download_dir = TempDir::new().unwrap();
        let db_file = NamedTempFile::new().unwrap();

        let url = format!("sqlite://{}?mode=rwc", db_file.path().display());
        let db = Database::connect(&url).await.unwrap();
        sqlx::query(CREATE_MOLECULE_TABLE)
            .execute(db.pool())
            .await
            .unwrap();

        Self {
            server,
            db: Arc::new(db),
            download_dir,
            _db_file: db_file,
        }
    }

    /// Download directory used by the finder
    pub fn download_dir(&self) -> &Path {
        self.download_dir.path()
    }

    /// Path the sheet for `cas_nr` is cached at
    pub fn sds_path(&self, cas_nr: &str) -> PathBuf {
        self.download_dir().join(format!("{cas_nr}.pdf"))
    }

    /// Configuration pointing every source at the mock server
    pub fn config(&self) -> Config {
        let mut config = Config {
            sources: SourcesConfig::with_base_url(&self.server.uri()),
            ..Default::default()
        };
        config.download.download_dir = self.download_dir().to_path_buf();
        config.download.workers = 4;
        config
    }

    /// Finder wired exactly as the binary wires it
    pub fn finder(&self) -> SdsFinder {
        SdsFinder::new(self.config()).unwrap()
    }

    /// The molecule database as the finder sees it
    pub fn store(&self) -> Arc<dyn MoleculeStore> {
        self.db.clone()
    }

    /// Add a molecule without any sheet
    pub async fn add_molecule(&self, cas_nr: &str) {
        sqlx::query("INSERT INTO molecule (cas_nr) VALUES (?)")
            .bind(cas_nr.to_string())
            .execute(self.db.pool())
            .await
            .unwrap();
    }

    /// Sheet source label and bytes stored for `cas_nr`
    pub async fn stored_sds(&self, cas_nr: &str) -> Option<(String, Vec<u8>)> {
        let row = sqlx::query(
            "SELECT default_safety_sheet_by, default_safety_sheet_blob FROM molecule WHERE cas_nr = ?",
        )
        .bind(cas_nr.to_string())
        .fetch_one(self.db.pool())
        .await
        .unwrap();

        let by: Option<String> = row.get(0);
        let blob: Option<Vec<u8>> = row.get(1);
        by.zip(blob)
    }
}
