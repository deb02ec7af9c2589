//! Error types for oe-find-sds
//!
//! This module provides the error handling for the library:
//! - [`Error`], the crate-wide error returned by fallible operations
//! - [`DatabaseError`] for connection and query failures against the datastore
//! - [`LookupError`] for everything that can go wrong while asking a vendor site
//!   for a safety data sheet
//!
//! Lookup errors never escape a site adapter: they are logged and turned into
//! "not found". Only connection establishment and the worklist query are fatal
//! for a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for oe-find-sds operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for oe-find-sds
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// SDS lookup or download failed
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The server rejected the credentials (MySQL error 1045)
    #[error("access denied for user {user}")]
    AccessDenied {
        /// User name that was rejected
        user: String,
    },

    /// The requested database does not exist (MySQL error 1049)
    #[error("unknown database {database}")]
    UnknownDatabase {
        /// Name of the missing database
        database: String,
    },

    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Updating a molecule record failed
    #[error("failed to update SDS for CAS {cas_nr}: {reason}")]
    UpdateFailed {
        /// CAS number of the molecule record
        cas_nr: String,
        /// Database error message
        reason: String,
    },
}

impl DatabaseError {
    /// Short message for the operator console.
    ///
    /// Wrong credentials and unknown databases get a one-line answer; anything
    /// else falls back to the full error text.
    pub fn operator_message(&self) -> String {
        match self {
            DatabaseError::AccessDenied { .. } => "Wrong password!".to_string(),
            DatabaseError::UnknownDatabase { .. } => "Database does not exist".to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors raised while looking up an SDS on a vendor site
///
/// Every variant means "not found" to the caller; the distinction only
/// matters for debug logging and tests.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure or timeout
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected HTTP status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The server answered with a redirect, which is never trusted
    #[error("redirected from {url} to {location}")]
    Redirected {
        /// Requested URL
        url: String,
        /// Value of the Location header (empty if absent)
        location: String,
    },

    /// The source has no entry for this CAS number
    #[error("no SDS listed for CAS {cas_nr}")]
    NoMatch {
        /// Queried CAS number
        cas_nr: String,
    },

    /// The page or payload did not have the expected shape
    #[error("unexpected page structure: {0}")]
    Structure(String),

    /// The source returned a record for a different CAS number
    #[error("CAS mismatch: expected {expected}, found {found}")]
    CasMismatch {
        /// Queried CAS number
        expected: String,
        /// CAS number found in the response
        found: String,
    },

    /// A JSON payload could not be decoded
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSS selector failed to compile
    #[error("invalid selector {selector}: {reason}")]
    Selector {
        /// The selector source
        selector: String,
        /// Parser message
        reason: String,
    },

    /// A link could not be resolved to an absolute URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl LookupError {
    /// Build a [`LookupError::Structure`] from anything printable
    pub fn structure(message: impl Into<String>) -> Self {
        LookupError::Structure(message.into())
    }
}
