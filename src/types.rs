//! Core types for oe-find-sds

use std::collections::BTreeSet;

/// Snapshot of CAS numbers that need an SDS, taken once at run start
pub type Worklist = BTreeSet<String>;

/// A download link for an SDS, as reported by a URL-based source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdsLink {
    /// Label recorded in the datastore for this sheet (e.g. "Fisher")
    pub source: String,
    /// Absolute URL of the PDF
    pub url: String,
}

impl SdsLink {
    /// Create a new link
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
        }
    }
}

/// An SDS fetched directly by a source that cannot hand out stable URLs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdsDocument {
    /// Label recorded in the datastore for this sheet (e.g. "TCI")
    pub source: String,
    /// PDF bytes
    pub bytes: Vec<u8>,
}

/// Outcome of looking up one CAS number
///
/// | `downloaded` | `source`        | meaning                                   |
/// |--------------|-----------------|-------------------------------------------|
/// | `true`       | `None`          | file was already cached, provenance unknown |
/// | `true`       | `Some(label)`   | freshly downloaded from `label`           |
/// | `false`      | `None`          | no source had it, or the lookup failed    |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupResult {
    /// CAS number that was looked up
    pub cas_nr: String,
    /// Whether a file is (believed to be) in the cache
    pub downloaded: bool,
    /// Source label for fresh downloads
    pub source: Option<String>,
}

impl LookupResult {
    /// The file was already present before the run
    pub fn cached(cas_nr: impl Into<String>) -> Self {
        Self {
            cas_nr: cas_nr.into(),
            downloaded: true,
            source: None,
        }
    }

    /// The file was downloaded from `source` during this run
    pub fn fetched(cas_nr: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            cas_nr: cas_nr.into(),
            downloaded: true,
            source: Some(source.into()),
        }
    }

    /// Nothing was downloaded
    pub fn not_found(cas_nr: impl Into<String>) -> Self {
        Self {
            cas_nr: cas_nr.into(),
            downloaded: false,
            source: None,
        }
    }
}

/// What the persistence phase did with a batch of lookup results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Number of molecule records updated
    pub updated: usize,
    /// CAS numbers with no cached file at update time
    pub missing: BTreeSet<String>,
    /// CAS numbers whose update statement failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Final numbers for a whole run, printed to the operator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Size of the worklist
    pub worklist_size: usize,
    /// Number of lookups that produced a result (panicked tasks are not counted)
    pub looked_up: usize,
    /// Number of molecule records updated
    pub updated: usize,
    /// CAS numbers still without an SDS
    pub missing: BTreeSet<String>,
    /// CAS numbers whose update failed, with the error message
    pub failed_updates: Vec<(String, String)>,
}

impl RunSummary {
    /// Combine the fan-out and persistence phases into a summary
    pub fn new(worklist_size: usize, looked_up: usize, report: UpdateReport) -> Self {
        Self {
            worklist_size,
            looked_up,
            updated: report.updated,
            missing: report.missing,
            failed_updates: report.failed,
        }
    }
}
