//! Per-molecule download step
//!
//! One call to [`DownloadWorker::process`] takes a CAS number from "unknown"
//! to either "a sheet is in the cache" or "nothing found". It never fails:
//! every error on the way is logged and reported as not found.

use crate::cache::SdsCache;
use crate::error::Result;
use crate::resolver::FallbackResolver;
use crate::sources::{DirectSdsSource, send_direct};
use crate::types::{LookupResult, SdsLink};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Looks up, downloads and caches the SDS for one CAS number at a time
pub struct DownloadWorker {
    client: reqwest::Client,
    resolver: FallbackResolver,
    direct: Arc<dyn DirectSdsSource>,
    cache: Arc<dyn SdsCache>,
    download_timeout: Duration,
}

impl DownloadWorker {
    /// Create a worker.
    ///
    /// `client` is used for the final PDF download of links returned by
    /// `resolver`; `direct` is asked only when no link was found.
    pub fn new(
        client: reqwest::Client,
        resolver: FallbackResolver,
        direct: Arc<dyn DirectSdsSource>,
        cache: Arc<dyn SdsCache>,
        download_timeout: Duration,
    ) -> Self {
        Self {
            client,
            resolver,
            direct,
            cache,
            download_timeout,
        }
    }

    /// Make sure a sheet for `cas_nr` is in the cache
    pub async fn process(&self, cas_nr: &str) -> LookupResult {
        if self.cache.contains(cas_nr).await {
            debug!(cas_nr, "SDS already cached");
            return LookupResult::cached(cas_nr);
        }

        if let Some(link) = self.resolver.resolve(cas_nr).await {
            return match self.download_link(cas_nr, &link).await {
                Ok(()) => {
                    info!(cas_nr, source = %link.source, "SDS downloaded");
                    LookupResult::fetched(cas_nr, link.source)
                }
                Err(e) => {
                    warn!(cas_nr, source = %link.source, url = %link.url, error = %e, "SDS download failed");
                    LookupResult::not_found(cas_nr)
                }
            };
        }

        let Some(document) = self.direct.download(cas_nr).await else {
            info!(cas_nr, "No SDS found");
            return LookupResult::not_found(cas_nr);
        };

        match self.cache.store(cas_nr, &document.bytes).await {
            Ok(()) => {
                info!(cas_nr, source = %document.source, "SDS downloaded");
                LookupResult::fetched(cas_nr, document.source)
            }
            Err(e) => {
                warn!(cas_nr, source = %document.source, error = %e, "Failed to cache SDS");
                LookupResult::not_found(cas_nr)
            }
        }
    }

    async fn download_link(&self, cas_nr: &str, link: &SdsLink) -> Result<()> {
        let request = self.client.get(&link.url).timeout(self.download_timeout);
        let bytes = send_direct(request).await?.bytes().await?;
        self.cache.store(cas_nr, &bytes).await
    }
}
