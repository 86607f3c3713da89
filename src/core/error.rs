//! Typed error handling for the data-access layer
//!
//! # Error Categories
//!
//! - [`DaoError`]: errors raised by the repository and the predicate builder
//! - [`StoreError`]: errors reported by a storage backend
//!
//! A store signalling "no matching rows" uses [`StoreError::NoResult`]; the
//! repository turns that into an empty result instead of an error.
//!
//! # Example
//!
//! ```rust,ignore
//! match Repository::<User, _>::new(store) {
//!     Ok(users) => { /* ... */ }
//!     Err(DaoError::InvalidEntityKind { kind }) => {
//!         eprintln!("{} is not registered with the store", kind);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Convenience result alias for repository operations
pub type DaoResult<T> = Result<T, DaoError>;

/// The main error type of the repository layer
#[derive(Debug, Error)]
pub enum DaoError {
    /// A repository was requested for a kind the store does not manage
    #[error("Entity kind '{kind}' is not a registered persistable type")]
    InvalidEntityKind { kind: String },

    /// A dotted field path is empty or cannot be resolved against the schema
    #[error("Invalid field path '{path}': {message}")]
    InvalidFieldPath { path: String, message: String },

    /// A comparison was requested that the field type does not support
    #[error("Unsupported operation '{operation}' on field '{path}': {message}")]
    UnsupportedOperation {
        operation: String,
        path: String,
        message: String,
    },

    /// A bulk delete without any criteria was refused
    #[error("Refusing to delete every '{kind}' record: the filter has no criteria")]
    UnconditionalDelete { kind: String },

    /// Storage backend errors, propagated unmodified
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DaoError {
    pub(crate) fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        DaoError::InvalidFieldPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DaoError::InvalidEntityKind { .. } => "INVALID_ENTITY_KIND",
            DaoError::InvalidFieldPath { .. } => "INVALID_FIELD_PATH",
            DaoError::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            DaoError::UnconditionalDelete { .. } => "UNCONDITIONAL_DELETE",
            DaoError::Store(e) => e.error_code(),
        }
    }
}

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend found no row for a query that expects one
    #[error("No matching rows")]
    NoResult,

    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// Data integrity error (duplicate keys, constraint violations)
    #[error("Data integrity error: {message}")]
    Integrity { message: String },

    /// Failed to serialize/deserialize a record
    #[error("Failed to serialize/deserialize {entity_type}: {message}")]
    Serialization {
        entity_type: String,
        message: String,
    },

    /// Backend not available
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },

    /// Any other backend failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NoResult => "NO_RESULT",
            StoreError::Connection { .. } => "STORAGE_CONNECTION_ERROR",
            StoreError::Query { .. } => "STORAGE_QUERY_ERROR",
            StoreError::Integrity { .. } => "STORAGE_INTEGRITY_ERROR",
            StoreError::Serialization { .. } => "STORAGE_SERIALIZATION_ERROR",
            StoreError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
            StoreError::Other(_) => "STORAGE_ERROR",
        }
    }
}
