//! # oe-find-sds
//!
//! Finds safety data sheets (SDS) for the molecules of an inventory database
//! that have none, downloads them as `<cas>.pdf` and attaches them to the
//! molecule records.
//!
//! ## How a run works
//!
//! 1. The CAS numbers of molecules without a usable sheet are read once.
//! 2. Each CAS number is looked up in parallel. Vendor sites are asked in a
//!    fixed order (ChemBlink, Fisher, ChemicalSafety, Fluorochem) and TCI is
//!    the last resort. Sheets already in the download directory are reused.
//! 3. Every sheet present in the download directory is written to its
//!    molecule records; the rest are reported as missing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oe_find_sds::{Config, Database, SdsFinder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let db = Database::connect_mysql(&config.database, "secret", "chemicals").await?;
//!
//!     let finder = SdsFinder::new(config)?;
//!     let summary = finder.run(Arc::new(db)).await?;
//!     println!("{} SDS files updated!", summary.updated);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// SDS file cache
pub mod cache;
/// Configuration types
pub mod config;
/// Operator prompts and summary output
pub mod console;
/// Datastore layer
pub mod db;
/// Error types
pub mod error;
/// Bounded parallel lookups
pub mod executor;
/// Run orchestration
pub mod finder;
/// Writing sheets back to molecule records
pub mod persistence;
/// Priority-ordered source lookup
pub mod resolver;
/// Vendor site adapters
pub mod sources;
/// Core types
pub mod types;
/// Per-molecule download step
pub mod worker;

// Re-export commonly used types
pub use cache::{DiskCache, MemoryCache, SdsCache};
pub use config::{Config, DatabaseConfig, DownloadConfig, SourcesConfig};
pub use db::{Database, MoleculeStore};
pub use error::{DatabaseError, Error, LookupError, Result};
pub use finder::SdsFinder;
pub use resolver::FallbackResolver;
pub use types::{LookupResult, RunSummary, SdsDocument, SdsLink, UpdateReport, Worklist};
pub use worker::DownloadWorker;
