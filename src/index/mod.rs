//! File Index: the persisted catalog of flat files and its builder.
//!
//! The catalog maps a stable genome key to a flat-file location and a
//! precomputed row count. It is built offline by the indexing job
//! ([`rebuild`]) and is read-only to request handling.

pub mod builder;
pub mod catalog;

pub use builder::{rebuild, scan_directory, IndexingReport, WRITE_BATCH_SIZE};
pub use catalog::{Catalog, IndexEntry, Predicate};
