//! Vendor site adapters
//!
//! Each adapter knows how to ask one vendor for the safety data sheet of a CAS
//! number. URL-based adapters implement [`SdsSource`] and hand back a link;
//! TCI cannot hand out a stable link and implements [`DirectSdsSource`],
//! returning the document itself.
//!
//! Adapters never fail loudly: [`SdsSource::find`] and
//! [`DirectSdsSource::download`] turn every [`LookupError`] into `None` and log
//! the detail at `debug` level.
//!
//! ## Submodules
//!
//! - [`chemblink`]: listing page scrape (tried first)
//! - [`fisher`]: catalog search form
//! - [`chemicalsafety`]: three-call JSON RPC
//! - [`fluorochem`]: JSON search returning an HTML table
//! - [`tci`]: session-based direct download (last resort)

use crate::config::SourcesConfig;
use crate::error::LookupError;
use crate::types::{SdsDocument, SdsLink};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub mod chemblink;
pub mod chemicalsafety;
pub mod fisher;
pub mod fluorochem;
mod html;
mod http;
pub mod tci;

pub use chemblink::ChemBlink;
pub use chemicalsafety::ChemicalSafety;
pub use fisher::Fisher;
pub use fluorochem::Fluorochem;
pub use http::build_client;
pub(crate) use http::send_direct;
pub use tci::Tci;

/// A vendor site that can point to an SDS by URL
#[async_trait]
pub trait SdsSource: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Look up `cas_nr`, reporting why nothing was found
    async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError>;

    /// Look up `cas_nr`; any failure is "not found"
    async fn find(&self, cas_nr: &str) -> Option<SdsLink> {
        debug!(source = self.name(), cas_nr, "Searching");
        match self.lookup(cas_nr).await {
            Ok(link) => {
                debug!(source = self.name(), cas_nr, url = %link.url, "SDS link found");
                Some(link)
            }
            Err(e) => {
                debug!(source = self.name(), cas_nr, error = %e, "SDS not found");
                None
            }
        }
    }
}

/// A vendor site that can only deliver the SDS itself
#[async_trait]
pub trait DirectSdsSource: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Fetch the sheet for `cas_nr`, reporting why nothing was fetched
    async fn fetch(&self, cas_nr: &str) -> Result<SdsDocument, LookupError>;

    /// Fetch the sheet for `cas_nr`; any failure is "not found"
    async fn download(&self, cas_nr: &str) -> Option<SdsDocument> {
        debug!(source = self.name(), cas_nr, "Searching");
        match self.fetch(cas_nr).await {
            Ok(document) => Some(document),
            Err(e) => {
                debug!(source = self.name(), cas_nr, error = %e, "SDS not found");
                None
            }
        }
    }
}

/// The URL-based sources in priority order: ChemBlink, Fisher, ChemicalSafety, Fluorochem
pub fn url_sources(client: &reqwest::Client, config: &SourcesConfig) -> Vec<Arc<dyn SdsSource>> {
    vec![
        Arc::new(ChemBlink::new(
            client.clone(),
            &config.chemblink_url,
            config.chemblink_timeout,
        )),
        Arc::new(Fisher::new(
            client.clone(),
            &config.fisher_url,
            config.fisher_timeout,
        )),
        Arc::new(ChemicalSafety::new(
            client.clone(),
            &config.chemicalsafety_url,
            config.chemicalsafety_timeout,
        )),
        Arc::new(Fluorochem::new(
            client.clone(),
            &config.fluorochem_url,
            &config.fluorochem_sds_template,
            config.fluorochem_timeout,
        )),
    ]
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_sources_priority_order() {
        let client = build_client("test-agent", false).unwrap();
        let sources = url_sources(&client, &SourcesConfig::default());
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["ChemBlink", "Fisher", "ChemicalSafety", "Fluorochem"]);
    }
}
