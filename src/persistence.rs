//! Writes cached sheets back to the molecule records
//!
//! Runs after every lookup has finished. The cache decides what gets written:
//! a result claiming a download whose file has since vanished counts as
//! missing, and a cached file is written even when the lookup reported a miss.

use crate::cache::SdsCache;
use crate::db::MoleculeStore;
use crate::types::{LookupResult, UpdateReport};
use std::sync::Arc;
use tracing::{error, info};

/// Applies lookup results to the datastore one record at a time
pub struct PersistenceUpdater {
    store: Arc<dyn MoleculeStore>,
    cache: Arc<dyn SdsCache>,
    default_source_label: String,
    mime_type: String,
}

impl PersistenceUpdater {
    /// Create an updater.
    ///
    /// `default_source_label` is recorded for sheets with no known source
    /// (files cached by an earlier run).
    pub fn new(
        store: Arc<dyn MoleculeStore>,
        cache: Arc<dyn SdsCache>,
        default_source_label: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            default_source_label: default_source_label.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Write every cached sheet in `results`, in order
    pub async fn update_all(&self, results: &[LookupResult]) -> UpdateReport {
        let mut report = UpdateReport::default();

        for result in results {
            let cas_nr = result.cas_nr.as_str();

            let bytes = match self.cache.load(cas_nr).await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    report.missing.insert(cas_nr.to_string());
                    continue;
                }
                Err(e) => {
                    error!(cas_nr, error = %e, "Failed to read cached SDS");
                    report.missing.insert(cas_nr.to_string());
                    continue;
                }
            };

            let label = result
                .source
                .as_deref()
                .unwrap_or(&self.default_source_label);

            match self
                .store
                .store_sds(cas_nr, label, &self.mime_type, &bytes)
                .await
            {
                Ok(_) => {
                    info!(cas_nr, source = label, "SDS uploaded successfully");
                    report.updated += 1;
                }
                Err(e) => {
                    error!(cas_nr, error = %e, "Failed to update molecule record");
                    report.failed.push((cas_nr.to_string(), e.to_string()));
                }
            }
        }

        report
    }
}
