//! SDS cache: "is there already a `<cas>.pdf` for this molecule?"
//!
//! The download directory is both the output of a run and the memory between
//! runs. [`DiskCache`] is that directory; [`MemoryCache`] keeps the same
//! contract in a map so the pipeline can be tested without touching disk.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Storage for downloaded safety data sheets, keyed by CAS number
#[async_trait]
pub trait SdsCache: Send + Sync {
    /// Make the cache ready for use (e.g. create the directory)
    async fn prepare(&self) -> Result<()>;

    /// Whether a sheet is stored for `cas_nr`
    async fn contains(&self, cas_nr: &str) -> bool;

    /// Store the sheet for `cas_nr`, replacing any previous one
    async fn store(&self, cas_nr: &str, bytes: &[u8]) -> Result<()>;

    /// Read the sheet for `cas_nr`, `None` if absent
    async fn load(&self, cas_nr: &str) -> Result<Option<Vec<u8>>>;
}

/// Directory of `<cas>.pdf` files
#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Create a cache rooted at `dir` (not created until [`SdsCache::prepare`])
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the sheet for `cas_nr`
    ///
    /// CAS numbers containing path separators are refused so a malformed
    /// datastore value cannot point outside the download directory.
    pub fn path_for(&self, cas_nr: &str) -> Result<PathBuf> {
        if cas_nr.is_empty() || cas_nr.contains(['/', '\\']) || cas_nr.starts_with('.') {
            return Err(Error::Other(format!(
                "CAS number {cas_nr:?} cannot be used as a file name"
            )));
        }
        Ok(self.dir.join(format!("{cas_nr}.pdf")))
    }
}

#[async_trait]
impl SdsCache for DiskCache {
    async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    async fn contains(&self, cas_nr: &str) -> bool {
        match self.path_for(cas_nr) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn store(&self, cas_nr: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(cas_nr)?;
        // Write next to the target and rename so a crashed write never looks cached
        let partial = path.with_extension("pdf.part");
        tokio::fs::write(&partial, bytes).await?;
        tokio::fs::rename(&partial, &path).await?;
        Ok(())
    }

    async fn load(&self, cas_nr: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(cas_nr)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory cache with the same contract as [`DiskCache`]
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with `(cas_nr, bytes)` pairs
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Drop the sheet for `cas_nr`, as if the file had been deleted
    pub async fn remove(&self, cas_nr: &str) -> Option<Vec<u8>> {
        self.entries.lock().await.remove(cas_nr)
    }

    /// Number of stored sheets
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl SdsCache for MemoryCache {
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    async fn contains(&self, cas_nr: &str) -> bool {
        self.entries.lock().await.contains_key(cas_nr)
    }

    async fn store(&self, cas_nr: &str, bytes: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(cas_nr.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn load(&self, cas_nr: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().await.get(cas_nr).cloned())
    }
}
