//! Datastore layer for oe-find-sds
//!
//! The only table touched is the molecule inventory's `molecule` table, read
//! once to build the worklist and written once per downloaded sheet.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by concern:
//! - [`connect`]: pool lifecycle and connection error classification
//! - [`molecules`]: worklist query and SDS updates

use crate::Result;
use crate::types::Worklist;
use async_trait::async_trait;
use sqlx::AnyPool;

mod connect;
mod molecules;

/// Read and write access to molecule records
#[async_trait]
pub trait MoleculeStore: Send + Sync {
    /// Distinct, non-empty CAS numbers of molecules without a usable SDS.
    ///
    /// A molecule qualifies when it has no sheet, no source label, or the
    /// `legacy_source_label` placeholder as its source.
    async fn missing_sds_cas_numbers(&self, legacy_source_label: &str) -> Result<Worklist>;

    /// Attach `bytes` as the default safety sheet of every molecule with
    /// `cas_nr`, clearing the sheet URL. Returns the number of rows changed.
    async fn store_sds(
        &self,
        cas_nr: &str,
        source_label: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<u64>;
}

/// Datastore handle backed by a single-connection sqlx pool
pub struct Database {
    pool: AnyPool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
