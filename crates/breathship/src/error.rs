//! Error types for breathship.
//!
//! This module defines all error types used throughout the breathship crate,
//! covering the transport, record, import, storage and configuration failures
//! that the data source adapters and the admin surface can produce.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::EntityKind;

/// The main error type for breathship operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The backend answered with an empty body where data was expected.
    #[error("empty response from {url}")]
    EmptyResponse {
        /// Requested URL.
        url: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("failed to parse response from {url}: {source}")]
    ResponseParse {
        /// Requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A sheet export could not be read as CSV.
    #[error("malformed CSV: {message}")]
    CsvFormat {
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// No record with the given id exists.
    #[error("{kind} record '{id}' not found")]
    NotFound {
        /// Entity kind that was searched.
        kind: EntityKind,
        /// The id that was requested.
        id: String,
    },

    /// No content field with the given name exists in the backing store.
    #[error("content field '{0}' not found")]
    FieldNotFound(String),

    /// The selected backend cannot be written to.
    #[error("the {backend} backend is read-only")]
    ReadOnly {
        /// Backend name.
        backend: &'static str,
    },

    /// A record could not be converted into its typed form.
    #[error("invalid {kind} record: {message}")]
    InvalidRecord {
        /// Entity kind of the record.
        kind: EntityKind,
        /// Description of the problem.
        message: String,
    },

    // === Import Errors ===
    /// A content snapshot could not be imported.
    #[error("invalid import file: {0}")]
    ImportFormat(String),

    // === Storage Errors ===
    /// Failed to open or create the local store.
    #[error("failed to open store at {path}: {source}")]
    StoreOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A local store query failed.
    #[error("store query failed: {0}")]
    StoreQuery(#[from] rusqlite::Error),

    /// Failed to bring the local store schema up to date.
    #[error("store migration failed: {message}")]
    StoreMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Admin Errors ===
    /// The admin access code did not match.
    #[error("invalid access code")]
    AccessDenied,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for breathship operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for a record id.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid record error.
    #[must_use]
    pub fn invalid_record(kind: EntityKind, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the addressed record or field does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::FieldNotFound(_))
    }

    /// Check if this error comes from writing to a read-only backend.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// Check if this error came back from the remote side of a request.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::HttpStatus { .. }
                | Self::EmptyResponse { .. }
                | Self::ResponseParse { .. }
                | Self::CsvFormat { .. }
        )
    }
}
