//! Configuration types for oe-find-sds

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Download behavior configuration (directory, concurrency, final fetch)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory holding one `<cas>.pdf` per molecule (default: "/var/lib/mysql/missing_sds")
    ///
    /// The directory doubles as the de-duplication cache: a CAS number with a
    /// file here is never looked up again.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Number of molecules looked up concurrently (default: 10)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for fetching the SDS document once a URL is known (default: 20s)
    #[serde(default = "default_download_timeout", with = "duration_serde")]
    pub download_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            workers: default_workers(),
            download_timeout: default_download_timeout(),
        }
    }
}

/// Datastore connection and molecule-table settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MySQL/MariaDB host (default: "localhost")
    #[serde(default = "default_db_host")]
    pub host: String,

    /// MySQL/MariaDB port (default: 3306)
    #[serde(default = "default_db_port")]
    pub port: u16,

    /// User to connect as (default: "root")
    #[serde(default = "default_db_user")]
    pub user: String,

    /// Source label that marks an SDS as missing even when a blob is stored (default: "Acros")
    ///
    /// Older Open Enventory imports recorded this vendor for sheets that were
    /// never actually attached.
    #[serde(default = "default_legacy_source_label")]
    pub legacy_source_label: String,

    /// Label written when a cached file has no known provenance (default: "SDS")
    #[serde(default = "default_source_label")]
    pub default_source_label: String,

    /// MIME type stored with every uploaded sheet (default: "application/pdf")
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            legacy_source_label: default_legacy_source_label(),
            default_source_label: default_source_label(),
            mime_type: default_mime_type(),
        }
    }
}

impl DatabaseConfig {
    /// Build a MySQL connection URL for `database`, percent-encoding the credentials.
    pub fn mysql_url(&self, password: &str, database: &str) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(password),
            self.host,
            self.port,
            urlencoding::encode(database)
        )
    }
}

/// Endpoints, identities and timeouts of the vendor sites
///
/// Base URLs are configurable so the adapters can be pointed at a mirror or a
/// local mock server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// User-Agent sent to every URL-based source and to the final download
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// User-Agent sent to TCI
    #[serde(default = "default_tci_user_agent")]
    pub tci_user_agent: String,

    /// ChemBlink base URL
    #[serde(default = "default_chemblink_url")]
    pub chemblink_url: String,

    /// ChemBlink request timeout (default: 20s)
    #[serde(default = "default_long_timeout", with = "duration_serde")]
    pub chemblink_timeout: Duration,

    /// Fisher Scientific base URL
    #[serde(default = "default_fisher_url")]
    pub fisher_url: String,

    /// Fisher request timeout (default: 10s)
    #[serde(default = "default_short_timeout", with = "duration_serde")]
    pub fisher_timeout: Duration,

    /// ChemicalSafety base URL
    #[serde(default = "default_chemicalsafety_url")]
    pub chemicalsafety_url: String,

    /// Timeout for each of the three ChemicalSafety calls (default: 20s)
    #[serde(default = "default_long_timeout", with = "duration_serde")]
    pub chemicalsafety_timeout: Duration,

    /// Fluorochem base URL
    #[serde(default = "default_fluorochem_url")]
    pub fluorochem_url: String,

    /// SDS URL template for Fluorochem, `{}` is replaced by the product code
    #[serde(default = "default_fluorochem_sds_template")]
    pub fluorochem_sds_template: String,

    /// Fluorochem request timeout (default: 20s)
    #[serde(default = "default_long_timeout", with = "duration_serde")]
    pub fluorochem_timeout: Duration,

    /// TCI Chemicals base URL
    #[serde(default = "default_tci_url")]
    pub tci_url: String,

    /// Timeout for the TCI search page (default: 10s)
    #[serde(default = "default_short_timeout", with = "duration_serde")]
    pub tci_search_timeout: Duration,

    /// Timeout for the TCI detail and document pages (default: 15s)
    #[serde(default = "default_tci_document_timeout", with = "duration_serde")]
    pub tci_document_timeout: Duration,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            tci_user_agent: default_tci_user_agent(),
            chemblink_url: default_chemblink_url(),
            chemblink_timeout: default_long_timeout(),
            fisher_url: default_fisher_url(),
            fisher_timeout: default_short_timeout(),
            chemicalsafety_url: default_chemicalsafety_url(),
            chemicalsafety_timeout: default_long_timeout(),
            fluorochem_url: default_fluorochem_url(),
            fluorochem_sds_template: default_fluorochem_sds_template(),
            fluorochem_timeout: default_long_timeout(),
            tci_url: default_tci_url(),
            tci_search_timeout: default_short_timeout(),
            tci_document_timeout: default_tci_document_timeout(),
        }
    }
}

impl SourcesConfig {
    /// Point every source at one base URL (used with mock servers).
    ///
    /// The Fluorochem SDS template is rewritten to `{base}/webservices/msds?...`.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            chemblink_url: base.clone(),
            fisher_url: base.clone(),
            chemicalsafety_url: base.clone(),
            fluorochem_url: base.clone(),
            fluorochem_sds_template: format!(
                "{}/webservices/msds?brand=fluorochem&catalog={{}}&embed=true",
                base
            ),
            tci_url: base,
            ..Self::default()
        }
    }
}

/// Main configuration for a run
///
/// Every field has a default, so an empty TOML file (or no file at all) is a
/// valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Datastore settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Vendor site settings
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.download.workers == 0 {
            return Err(Error::Config {
                message: "workers must be at least 1".to_string(),
                key: Some("workers".to_string()),
            });
        }
        if !self.sources.fluorochem_sds_template.contains("{}") {
            return Err(Error::Config {
                message: "fluorochem_sds_template must contain a {} placeholder".to_string(),
                key: Some("fluorochem_sds_template".to_string()),
            });
        }
        Ok(())
    }

    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("/var/lib/mysql/missing_sds")
}

fn default_workers() -> usize {
    10
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_user() -> String {
    "root".to_string()
}

fn default_legacy_source_label() -> String {
    "Acros".to_string()
}

fn default_source_label() -> String {
    "SDS".to_string()
}

fn default_mime_type() -> String {
    "application/pdf".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/53.0.2785.143 Safari/537.36".to_string()
}

fn default_tci_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/79.0.3945.130 Safari/537.36".to_string()
}

fn default_chemblink_url() -> String {
    "https://www.chemblink.com".to_string()
}

fn default_fisher_url() -> String {
    "https://www.fishersci.com".to_string()
}

fn default_chemicalsafety_url() -> String {
    "https://chemicalsafety.com".to_string()
}

fn default_fluorochem_url() -> String {
    "http://www.fluorochem.co.uk".to_string()
}

fn default_fluorochem_sds_template() -> String {
    "https://www.cheminfo.org/webservices/msds?brand=fluorochem&catalog={}&embed=true".to_string()
}

fn default_tci_url() -> String {
    "https://www.tcichemicals.com".to_string()
}

fn default_short_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_long_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_tci_document_timeout() -> Duration {
    Duration::from_secs(15)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
