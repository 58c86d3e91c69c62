//! Generic tab-delimited file parsing.
//!
//! Every per-genome annotation table shares the same physical layout:
//! tab-delimited fields, one header line of column names, optional
//! `#`-comment lines, gzip compression by file extension. This module
//! provides the shared infrastructure: the [`TabDelimitedRecord`] trait
//! for typed records and the streaming [`TabDelimitedParser`] that works
//! with any type implementing it.
//!
//! Parsing is streaming with constant memory: one line in flight at a
//! time, records yielded through the `Iterator` interface. Row order is
//! the on-file line order, which is the canonical within-file order used
//! by the paging arithmetic — it is stable across repeated parses of an
//! unmodified file.
//!
//! # Examples
//!
//! ```
//! use flatpage::formats::primitives::{TabDelimitedParser, TabDelimitedRecord, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct SimpleRecord {
//!     id: String,
//!     count: u64,
//! }
//!
//! impl TabDelimitedRecord for SimpleRecord {
//!     fn from_line(line: &str) -> Result<Self> {
//!         let fields: Vec<_> = line.split('\t').collect();
//!         Ok(SimpleRecord {
//!             id: fields[0].to_string(),
//!             count: fields[1].parse().unwrap_or(0),
//!         })
//!     }
//!
//!     fn to_line(&self) -> String {
//!         format!("{}\t{}", self.id, self.count)
//!     }
//! }
//!
//! let data = "id\tcount\np1\t3\np2\t5\n";
//! let parser = TabDelimitedParser::<_, SimpleRecord>::new(data.as_bytes()).skip_lines(1);
//! let records: Vec<_> = parser.collect::<Result<_>>().unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].id, "p1");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use super::Result;

/// Trait for types that can be parsed from tab-delimited lines.
pub trait TabDelimitedRecord: Sized {
    /// Parse a record from a tab-delimited line.
    ///
    /// The line should not include the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is malformed or contains invalid data.
    fn from_line(line: &str) -> Result<Self>;

    /// Serialize this record to a tab-delimited line.
    ///
    /// The returned string should not include a trailing newline.
    fn to_line(&self) -> String;

    /// Expected number of tab-delimited fields.
    ///
    /// Returns `None` if the number of fields is variable.
    fn expected_fields() -> Option<usize> {
        None
    }
}

/// Open a flat file for reading, decompressing `.gz` transparently.
pub fn open_flat(path: impl AsRef<Path>) -> std::io::Result<Box<dyn Read>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.extension().is_some_and(|e| e == std::ffi::OsStr::new("gz")) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Count data rows in a line-oriented flat file.
///
/// A data row is any line after the first `header_lines` raw lines that
/// is neither empty nor a `#`-comment — exactly the lines a
/// [`TabDelimitedParser`] with the same header skip would yield items
/// for. The File Index records this count, so the two definitions must
/// not diverge.
pub fn count_data_lines<R: BufRead>(mut reader: R, header_lines: usize) -> std::io::Result<u64> {
    let mut count = 0u64;
    let mut raw_line = 0usize;
    let mut buf = String::new();

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(count);
        }
        raw_line += 1;
        if raw_line <= header_lines {
            continue;
        }
        let line = buf.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        count += 1;
    }
}

/// Generic streaming parser for tab-delimited formats.
///
/// Parses records one at a time with constant memory usage.
/// Automatically skips:
/// - A configurable number of leading header lines ([`Self::skip_lines`])
/// - Empty lines
/// - Comment lines (starting with `#`)
///
/// Malformed lines are yielded as `Err` items; the iterator continues
/// afterwards, so each data line accounts for exactly one item whether
/// it parsed or not.
pub struct TabDelimitedParser<R: Read, T: TabDelimitedRecord> {
    reader: BufReader<R>,
    line_buf: String,
    line_number: usize,
    header_remaining: usize,
    _phantom: PhantomData<T>,
}

impl<R: Read, T: TabDelimitedRecord> TabDelimitedParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn new(reader: R) -> Self {
        TabDelimitedParser {
            reader: BufReader::new(reader),
            line_buf: String::with_capacity(1024),
            line_number: 0,
            header_remaining: 0,
            _phantom: PhantomData,
        }
    }

    /// Skip the first `n` raw lines (header lines) before parsing records.
    pub fn skip_lines(mut self, n: usize) -> Self {
        self.header_remaining = n;
        self
    }

    /// Returns the current line number (1-based).
    ///
    /// Useful for error reporting.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<T: TabDelimitedRecord> TabDelimitedParser<Box<dyn Read>, T> {
    /// Creates a parser from a flat-file path, decompressing `.gz` by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn from_flat_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(open_flat(path)?))
    }
}

impl<R: Read, T: TabDelimitedRecord> Iterator for TabDelimitedParser<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buf.clear();

            match self.reader.read_line(&mut self.line_buf) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;

                    if self.header_remaining > 0 {
                        self.header_remaining -= 1;
                        continue;
                    }

                    let line = self.line_buf.trim_end();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('#') {
                        continue;
                    }

                    return Some(T::from_line(line));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
