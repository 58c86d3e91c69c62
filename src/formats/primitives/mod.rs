//! Shared primitives for annotation flat-file formats.
//!
//! This module provides reusable infrastructure for the tab-delimited
//! per-genome tables:
//! - Generic parsers and traits
//! - Field parsing utilities with the browser's missing-value policy
//! - The strand type shared by coordinate-bearing records

use thiserror::Error;

pub mod fields;
pub mod tab_delimited;

// Re-exports
pub use tab_delimited::{count_data_lines, open_flat, TabDelimitedParser, TabDelimitedRecord};

/// Errors that can occur when parsing annotation flat files.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid number of tab-delimited fields.
    #[error("Invalid number of fields: expected {expected}, got {actual} at line {line}")]
    FieldCount {
        /// Expected number of fields
        expected: usize,
        /// Actual number of fields found
        actual: usize,
        /// Line number where error occurred
        line: usize,
    },

    /// Invalid field value.
    #[error("Invalid field '{field}' at line {line}: {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// Line number where error occurred
        line: usize,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid strand specification.
    #[error("Invalid strand: {0} (expected '+' or '-')")]
    InvalidStrand(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Strand of a genomic feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Strand {
    /// Forward strand (`+`)
    #[serde(rename = "+")]
    Forward,
    /// Reverse strand (`-`)
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Canonical single-character representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strand {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(FormatError::InvalidStrand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_strand_parse() {
        assert_eq!(Strand::from_str("+").unwrap(), Strand::Forward);
        assert_eq!(Strand::from_str("-").unwrap(), Strand::Reverse);
        assert!(Strand::from_str(".").is_err());
    }

    #[test]
    fn test_strand_display() {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }
}
