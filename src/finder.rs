//! One complete run: worklist, parallel lookups, datastore updates

use crate::cache::{DiskCache, SdsCache};
use crate::config::Config;
use crate::db::MoleculeStore;
use crate::executor::fan_out;
use crate::persistence::PersistenceUpdater;
use crate::resolver::FallbackResolver;
use crate::sources::{DirectSdsSource, Tci, build_client, url_sources};
use crate::types::RunSummary;
use crate::worker::DownloadWorker;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Wires the components of a run together
pub struct SdsFinder {
    config: Config,
    worker: Arc<DownloadWorker>,
    cache: Arc<dyn SdsCache>,
}

impl SdsFinder {
    /// Build a finder with the real vendor adapters and the on-disk cache
    pub fn new(config: Config) -> Result<Self> {
        let client = build_client(&config.sources.user_agent, false).map_err(Error::Network)?;
        let resolver = FallbackResolver::new(url_sources(&client, &config.sources));
        let direct: Arc<dyn DirectSdsSource> = Arc::new(Tci::from_config(&config.sources));
        let cache: Arc<dyn SdsCache> = Arc::new(DiskCache::new(config.download_dir().clone()));

        Self::with_components(config, client, resolver, direct, cache)
    }

    /// Build a finder from explicit parts
    pub fn with_components(
        config: Config,
        client: reqwest::Client,
        resolver: FallbackResolver,
        direct: Arc<dyn DirectSdsSource>,
        cache: Arc<dyn SdsCache>,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            sources = ?resolver.source_names(),
            last_resort = direct.name(),
            workers = config.download.workers,
            "Finder configured"
        );

        let worker = Arc::new(DownloadWorker::new(
            client,
            resolver,
            direct,
            Arc::clone(&cache),
            config.download.download_timeout,
        ));

        Ok(Self {
            config,
            worker,
            cache,
        })
    }

    /// Look up every molecule without a usable SDS and store what was found.
    ///
    /// Fails only if the cache cannot be prepared or the worklist cannot be
    /// read; per-molecule problems end up in the summary.
    pub async fn run(&self, store: Arc<dyn MoleculeStore>) -> Result<RunSummary> {
        self.cache.prepare().await?;

        let worklist = store
            .missing_sds_cas_numbers(&self.config.database.legacy_source_label)
            .await?;
        info!(count = worklist.len(), "Molecules without SDS");

        let results = fan_out(
            Arc::clone(&self.worker),
            &worklist,
            self.config.download.workers,
        )
        .await;
        info!(
            looked_up = results.len(),
            downloaded = results.iter().filter(|r| r.downloaded).count(),
            "Lookups finished, updating datastore"
        );

        let updater = PersistenceUpdater::new(
            store,
            Arc::clone(&self.cache),
            self.config.database.default_source_label.clone(),
            self.config.database.mime_type.clone(),
        );
        let report = updater.update_all(&results).await;

        Ok(RunSummary::new(worklist.len(), results.len(), report))
    }
}
