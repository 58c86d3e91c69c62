//! flatpage: flat-file virtual pagination for microbial genomics browsers
//!
//! # Overview
//!
//! Some per-genome annotation tables (protein annotations, antibiotic
//! resistance genes, transmembrane helix predictions) are too large to
//! store as relational rows. flatpage serves them from one flat TSV file
//! per genome instead: a small persisted catalog records each file's key
//! and row count, and the pager resolves "page N of size S" against the
//! global ordering of all matching files' rows — opening only the files
//! a page actually touches, and only the row spans it needs.
//!
//! ## Key Features
//!
//! - **Virtual pagination**: one global row ordering spanning many files,
//!   paged without loading whole files
//! - **Streaming parsers**: constant memory, transparent gzip
//! - **Typed rows**: per-dataset record structs, not loose dictionaries
//! - **Failure containment**: one bad file shortens a page, never kills it
//! - **Short-TTL page cache**: absorbs repeated identical requests
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatpage::index::{self, Catalog};
//! use flatpage::paging::{PageRequest, Pager};
//! use flatpage::types::Dataset;
//!
//! # fn main() -> flatpage::Result<()> {
//! // Offline: index a directory of per-genome protein tables.
//! index::rebuild("/data/bacteria/mag/proteins", Dataset::Proteins, "bacteria.mag.proteins.idx")?;
//!
//! // Serving: resolve a page against the catalog.
//! let catalog = Catalog::from_path("bacteria.mag.proteins.idx")?;
//! let pager = Pager::new(&catalog, Dataset::Proteins);
//!
//! let page = pager.page(&PageRequest::new(2, 20))?;
//! println!("{} rows of {}", page.rows.len(), page.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`formats`]: flat-file parsers (proteins, ARGs, TMHs) and shared
//!   tab-delimited primitives
//! - [`index`]: the persisted catalog and the offline indexing job
//! - [`paging`]: the virtual pager, wire types, and the page cache
//! - [`types`]: partition vocabulary (organism group × assembly × dataset)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod formats;
pub mod index;
pub mod paging;
pub mod types;

// Re-export commonly used types
pub use error::{FlatpageError, Result};
pub use formats::{ArgRecord, HelixRecord, ProteinRecord, Row, TmhRecord};
pub use index::{Catalog, IndexEntry, IndexingReport, Predicate};
pub use paging::{PageCache, PageRequest, PageResult, Pager};
pub use types::{AssemblyType, Dataset, OrganismGroup, Partition};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
