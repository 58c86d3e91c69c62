//! Persisted flat-file catalog.
//!
//! The catalog is the small side of the storage split: one entry per
//! flat file, recording the genome key, the file location, and the row
//! count the paging arithmetic depends on. It is persisted as a
//! tab-delimited sidecar file (one entry per line) so it survives
//! restarts without a database and stays inspectable with standard
//! tools.
//!
//! # File Format
//!
//! Three tab-delimited columns per line:
//!
//! ```text
//! GCF_000123.1	/data/bacteria/mag/proteins/GCF_000123.1.tsv	4812
//! GCF_000456.2	/data/bacteria/mag/proteins/GCF_000456.2.tsv	3977
//! ```
//!
//! Entries are held sorted by key; that ordering is the canonical file
//! ordering behind the global row numbering, so it must be stable and
//! deterministic for repeated identical lookups.
//!
//! # Basic Usage
//!
//! ```no_run
//! use flatpage::index::{Catalog, Predicate};
//!
//! # fn main() -> flatpage::Result<()> {
//! let catalog = Catalog::from_path("bacteria.mag.proteins.idx")?;
//!
//! let matching = catalog.lookup(&Predicate::KeyContains("GCF_0001".into()));
//! let total: u64 = matching.iter().map(|e| e.row_count).sum();
//! println!("{} files, {} rows", matching.len(), total);
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{FlatpageError, Result};

/// One catalog entry: a flat file and its precomputed row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Stable genome/organism identifier, unique within the partition
    pub key: String,
    /// Path to the backing flat file
    pub file_path: PathBuf,
    /// Number of data rows in the file (excluding header lines; grouped
    /// rows for TMH files)
    pub row_count: u64,
}

impl IndexEntry {
    /// Parse a single catalog entry from a line
    ///
    /// Format: `KEY \t FILE_PATH \t ROW_COUNT`
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() != 3 {
            return Err(FlatpageError::Catalog {
                msg: format!("catalog entry must have 3 fields, got {}", fields.len()),
            });
        }

        let row_count = fields[2].parse::<u64>().map_err(|e| FlatpageError::Catalog {
            msg: format!("invalid row count for key '{}': {}", fields[0], e),
        })?;

        Ok(IndexEntry {
            key: fields[0].to_string(),
            file_path: PathBuf::from(fields[1]),
            row_count,
        })
    }

    /// Format entry as a catalog line
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.key,
            self.file_path.display(),
            self.row_count
        )
    }
}

/// Key-match condition for catalog lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Match every entry
    All,
    /// Exact key match (case-sensitive; accessions are canonical)
    KeyEquals(String),
    /// Substring key match (ASCII case-insensitive, search-box semantics)
    KeyContains(String),
}

impl Predicate {
    /// Does `key` satisfy this predicate?
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Predicate::All => true,
            Predicate::KeyEquals(wanted) => key == wanted,
            Predicate::KeyContains(needle) => key
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
        }
    }
}

/// In-memory catalog, sorted by key
///
/// Read-only after construction; the indexing job replaces the whole
/// persisted file rather than mutating entries in place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<IndexEntry>,
}

impl Catalog {
    /// Build a catalog from entries, sorting by key.
    ///
    /// # Errors
    ///
    /// Returns an error if two entries share a key: keys are unique
    /// within a partition, and a duplicate would make the global row
    /// numbering ambiguous.
    pub fn new(mut entries: Vec<IndexEntry>) -> Result<Self> {
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        if let Some(dup) = entries.windows(2).find(|w| w[0].key == w[1].key) {
            return Err(FlatpageError::Catalog {
                msg: format!("duplicate key '{}'", dup[0].key),
            });
        }

        Ok(Catalog { entries })
    }

    /// Load a catalog from its persisted file.
    ///
    /// Empty lines and `#`-comments are skipped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to open catalog {:?}: {}", path.as_ref(), e),
            )
        })?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = IndexEntry::from_line(&line).map_err(|e| FlatpageError::Catalog {
                msg: format!("line {}: {}", line_no + 1, e),
            })?;
            entries.push(entry);
        }

        Self::new(entries)
    }

    /// Write the catalog to a file, one entry per line in key order.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_line())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Entries matching `predicate`, in key-ascending order.
    ///
    /// O(matching entries); never touches file contents.
    pub fn lookup(&self, predicate: &Predicate) -> Vec<&IndexEntry> {
        self.entries
            .iter()
            .filter(|e| predicate.matches(&e.key))
            .collect()
    }

    /// Entry for an exact key, if present.
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by(|e| e.key.as_str().cmp(key))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// All entries, in key-ascending order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of catalogued files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
