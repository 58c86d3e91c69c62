//! Annotation flat-file format parsers.
//!
//! This module provides streaming-first parsers for the per-genome
//! annotation tables served by the browser:
//! - **Proteins**: gene calls + functional assignments, one row per line
//! - **ARGs**: resistance-gene hits, one row per line
//! - **TMHs**: transmembrane helix predictions, one row per *group* of lines
//!
//! All parsers implement:
//! - **Streaming architecture**: constant memory regardless of file size
//! - **Iterator-based API**: records yielded one at a time as `Result` items
//! - **Compression support**: transparent gzip decompression by extension
//! - **Missing-value policy**: `-`/empty cells become empty lists or `None`
//!
//! The dispatch functions at the bottom ([`read_row_range`],
//! [`count_rows`]) are the registry the paging engine works through: one
//! generic engine, parameterized by [`Dataset`], instead of one handler
//! copy per dataset.
//!
//! # Module Organization
//!
//! - [`primitives`]: shared infrastructure for tab-delimited formats
//! - [`protein`], [`arg`], [`tmh`]: the three dataset schemas

pub mod arg;
pub mod primitives;
pub mod protein;
pub mod tmh;

use std::io::BufReader;
use std::path::Path;

use serde::Serialize;

use crate::types::Dataset;
use primitives::open_flat;

// Re-export commonly used types
pub use arg::{ArgRecord, ArgTableParser};
pub use primitives::{FormatError, Strand};
pub use protein::{ProteinRecord, ProteinTableParser};
pub use tmh::{HelixRecord, TmhParser, TmhRecord, Topology};

/// Header lines at the top of every annotation flat file
pub const HEADER_LINES: usize = 1;

/// One decoded annotation row, tagged by dataset.
///
/// Serializes untagged, so a page of protein rows is wire-identical to a
/// plain list of protein objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    /// Protein annotation row
    Protein(ProteinRecord),
    /// Resistance-gene hit row
    Arg(ArgRecord),
    /// Transmembrane-helix prediction row (grouped)
    Tmh(TmhRecord),
}

/// Read rows `[start, start + len)` (0-based, within-file order) from one flat file.
///
/// Streams the file and materializes only the requested window; rows
/// before `start` are skipped without being fully decoded into the
/// result. A malformed row *inside* the window is an error (the caller
/// decides the skip policy); malformed rows before the window still
/// occupy their position, keeping offsets aligned with the indexed
/// row count.
pub fn read_row_range(
    dataset: Dataset,
    path: impl AsRef<Path>,
    start: u64,
    len: u64,
) -> primitives::Result<Vec<Row>> {
    let path = path.as_ref();
    match dataset {
        Dataset::Proteins => collect_range(
            ProteinTableParser::from_flat_path(path)?.skip_lines(HEADER_LINES),
            start,
            len,
            Row::Protein,
        ),
        Dataset::Args => collect_range(
            ArgTableParser::from_flat_path(path)?.skip_lines(HEADER_LINES),
            start,
            len,
            Row::Arg,
        ),
        Dataset::Tmhs => collect_range(
            TmhParser::from_flat_path(path)?.skip_lines(HEADER_LINES),
            start,
            len,
            Row::Tmh,
        ),
    }
}

/// Read every row of one flat file.
pub fn read_rows(dataset: Dataset, path: impl AsRef<Path>) -> primitives::Result<Vec<Row>> {
    read_row_range(dataset, path, 0, u64::MAX)
}

/// Count the rows of one flat file, by the dataset's row definition.
///
/// Line-oriented datasets count data lines; TMH files count grouped
/// rows. This is the count the File Index records, and it matches what
/// the corresponding parser yields for an unchanged file.
pub fn count_rows(dataset: Dataset, path: impl AsRef<Path>) -> primitives::Result<u64> {
    let reader = BufReader::new(open_flat(path)?);
    let count = match dataset {
        Dataset::Proteins | Dataset::Args => primitives::count_data_lines(reader, HEADER_LINES)?,
        Dataset::Tmhs => tmh::count_grouped_rows(reader, HEADER_LINES)?,
    };
    Ok(count)
}

fn collect_range<T, I, F>(iter: I, start: u64, len: u64, wrap: F) -> primitives::Result<Vec<Row>>
where
    I: Iterator<Item = primitives::Result<T>>,
    F: Fn(T) -> Row,
{
    let mut rows = Vec::new();
    for item in iter.skip(start as usize).take(len as usize) {
        rows.push(wrap(item?));
    }
    Ok(rows)
}
