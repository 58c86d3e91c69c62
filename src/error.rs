//! Error types for flatpage

use thiserror::Error;

use crate::formats::primitives::FormatError;

/// Result type alias for flatpage operations
pub type Result<T> = std::result::Result<T, FlatpageError>;

/// Error types that can occur in flatpage
#[derive(Debug, Error)]
pub enum FlatpageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Flat-file parsing error
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Search request referenced a field the index cannot filter on
    #[error("Unsupported search field '{field}' (searchable: genome_id)")]
    InvalidPredicate {
        /// Field name the client asked to filter on
        field: String,
    },

    /// Page number or page size outside the valid range
    #[error("Invalid pagination: {msg}")]
    InvalidPagination {
        /// What was wrong with the request
        msg: String,
    },

    /// Malformed or inconsistent catalog file
    #[error("Catalog error: {msg}")]
    Catalog {
        /// What was wrong with the catalog
        msg: String,
    },

    /// Unrecognized partition component (organism group, assembly type, or dataset)
    #[error("Unknown partition component: {value}")]
    InvalidPartition {
        /// The string that failed to parse
        value: String,
    },
}
