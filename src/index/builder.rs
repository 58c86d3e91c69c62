//! Offline indexing job: (re)build a partition's catalog from a
//! directory of flat files.
//!
//! The job scans one directory, derives each file's genome key from its
//! name, counts rows with the same row definition the parsers use, and
//! replaces the partition's catalog wholesale. There is no incremental
//! path: a rebuild is always delete-all-then-insert, written to a
//! staging file and renamed into place so concurrent readers never see
//! a half-built catalog.
//!
//! Unreadable or malformed files are skipped with a warning — a partial
//! index is preferable to none. Row counting runs in parallel across
//! files; the final key sort restores deterministic output.
//!
//! After a rebuild, any [`crate::paging::PageCache`] serving the
//! partition should be cleared: cached pages were assembled against the
//! previous counts.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::formats;
use crate::index::catalog::{Catalog, IndexEntry};
use crate::types::Dataset;

/// Entries are flushed to the staging file in batches of this size.
pub const WRITE_BATCH_SIZE: usize = 1000;

/// Flat-file suffixes the scanner recognizes
const FLAT_SUFFIXES: &[&str] = &[".tsv", ".tsv.gz"];

/// Outcome of one indexing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingReport {
    /// Files successfully counted and catalogued
    pub indexed: usize,
    /// Files skipped as unreadable or malformed
    pub skipped: usize,
}

/// Derive the genome key from a flat-file name, if it is one.
fn key_from_file_name(name: &str) -> Option<&str> {
    FLAT_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
}

/// Scan a directory of flat files into an in-memory catalog.
///
/// Only `*.tsv` and `*.tsv.gz` entries are considered; anything else in
/// the directory is ignored. Files whose rows cannot be counted are
/// skipped with a warning and reported, not fatal.
///
/// # Errors
///
/// Returns an error if the directory itself cannot be read, or if two
/// files derive the same key (e.g. `a.tsv` next to `a.tsv.gz`).
pub fn scan_directory(dir: impl AsRef<Path>, dataset: Dataset) -> Result<(Catalog, IndexingReport)> {
    let dir = dir.as_ref();

    let mut paths: Vec<(String, PathBuf)> = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }
        let name = dir_entry.file_name();
        if let Some(key) = name.to_str().and_then(key_from_file_name) {
            paths.push((key.to_string(), dir_entry.path()));
        }
    }

    let counted: Vec<Option<IndexEntry>> = paths
        .par_iter()
        .map(|(key, path)| match formats::count_rows(dataset, path) {
            Ok(row_count) => Some(IndexEntry {
                key: key.clone(),
                file_path: path.clone(),
                row_count,
            }),
            Err(e) => {
                tracing::warn!(key = %key, path = ?path, error = %e, "skipping uncountable flat file");
                None
            }
        })
        .collect();

    let entries: Vec<IndexEntry> = counted.into_iter().flatten().collect();
    let report = IndexingReport {
        indexed: entries.len(),
        skipped: paths.len() - entries.len(),
    };

    Ok((Catalog::new(entries)?, report))
}

/// Rebuild a partition's persisted catalog from a flat-file directory.
///
/// Scans `dir`, writes the new catalog to a staging file next to
/// `catalog_path` in batches of [`WRITE_BATCH_SIZE`] entries, then
/// atomically renames it over the previous catalog. Running twice on an
/// unchanged directory produces byte-identical output.
pub fn rebuild(
    dir: impl AsRef<Path>,
    dataset: Dataset,
    catalog_path: impl AsRef<Path>,
) -> Result<IndexingReport> {
    let catalog_path = catalog_path.as_ref();
    let (catalog, report) = scan_directory(dir, dataset)?;

    let mut staging = catalog_path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    {
        let mut writer = BufWriter::new(fs::File::create(&staging)?);
        for batch in catalog.entries().chunks(WRITE_BATCH_SIZE) {
            for entry in batch {
                writeln!(writer, "{}", entry.to_line())?;
            }
            writer.flush()?;
        }
    }
    fs::rename(&staging, catalog_path)?;

    tracing::info!(
        dataset = %dataset,
        indexed = report.indexed,
        skipped = report.skipped,
        catalog = ?catalog_path,
        "catalog rebuilt"
    );

    Ok(report)
}
