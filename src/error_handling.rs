//! Error type definitions.
//!
//! All failures surfaced by the store are typed: configuration problems
//! (unrecognized backend identifier), codec failures on the JSON-encoded
//! columns, and SQL execution failures wrapped with operation context.
//! Absence of a spectrum for a marker is not an error and is represented
//! as `Ok(None)` by the read path.

use thiserror::Error;

/// Error types for spectrum store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The configured backend identifier is not in the supported set.
    /// No SQL is issued for the failing call.
    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),

    /// Serializing a domain value for storage failed.
    #[error("encode {0}: {1}")]
    Encode(&'static str, #[source] serde_json::Error),

    /// A stored payload could not be parsed back into its domain value.
    #[error("decode {0}: {1}")]
    Decode(&'static str, #[source] serde_json::Error),

    /// SQL execution error, tagged with the operation stage that failed.
    #[error("{0}: {1}")]
    Sql(&'static str, #[source] sqlx::Error),

    /// No usable row ID for an insert: the driver reported no last-inserted
    /// ID, or a client-generated ID could not be produced.
    #[error("insert did not yield a row id")]
    MissingInsertId,
}
