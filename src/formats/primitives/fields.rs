//! Field-level parsing utilities for tab-delimited records.
//!
//! Annotation exports use `-` (and occasionally `.` or an empty cell) as
//! a placeholder for missing values. The helpers here make that policy
//! explicit: list-valued fields collapse to an empty list, optional
//! scalars to `None`, and only genuinely malformed values raise a
//! [`FormatError`].

use std::fmt::Display;
use std::str::FromStr;

use super::{FormatError, Result};

/// Placeholder strings treated as "no value" by annotation exporters
const MISSING: &[&str] = &["", "-", ".", "NA"];

/// Split a line into tab-delimited fields, optionally enforcing a count.
pub fn split_fields(line: &str, expected: Option<usize>, line_no: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();

    if let Some(expected) = expected {
        if fields.len() != expected {
            return Err(FormatError::FieldCount {
                expected,
                actual: fields.len(),
                line: line_no,
            });
        }
    }

    Ok(fields)
}

/// Returns `true` if the field is a recognized missing-value placeholder.
pub fn is_missing(field: &str) -> bool {
    MISSING.contains(&field)
}

/// Parse a mandatory typed field.
pub fn parse_required<T>(field: &str, name: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    field.parse().map_err(|e: T::Err| FormatError::InvalidField {
        field: name.to_string(),
        line: line_no,
        reason: e.to_string(),
    })
}

/// Parse an optional typed field; placeholders become `None`.
pub fn parse_optional<T>(field: &str, name: &str, line_no: usize) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    if is_missing(field) {
        return Ok(None);
    }
    parse_required(field, name, line_no).map(Some)
}

/// Parse a semicolon-separated list field; placeholders become an empty list.
pub fn parse_list(field: &str) -> Vec<String> {
    if is_missing(field) {
        return Vec::new();
    }
    field
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a list field back into its on-file form (`-` when empty).
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(";")
    }
}
