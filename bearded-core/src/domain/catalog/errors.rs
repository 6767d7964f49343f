//! Catalog lookup errors

use thiserror::Error;

/// Infrastructure failure while reading the catalog
///
/// Absence is not an error: repositories return `Ok(None)` for unknown ids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Database operation failed
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// Stored record could not be decoded
    #[error("Corrupt catalog record: {message}")]
    CorruptRecord { message: String },
}
