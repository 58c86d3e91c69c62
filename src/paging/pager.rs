//! The virtual pager: page arithmetic over catalogued flat files.
//!
//! A page is a window onto the *global* row numbering: matching catalog
//! entries sorted by key, each file contributing `row_count` rows in
//! its on-file order. The pager turns `(page, page_size)` into the file
//! spans that window intersects, then reads exactly those spans:
//!
//! ```text
//! files:   A (5 rows)   B (3 rows)    C (4 rows)
//! global:  0 1 2 3 4  | 5 6 7     |  8 9 10 11
//! page 2,  size 5  ->  global 5..=9  ->  B[0..=2] + C[0..=1]
//! ```
//!
//! Files that do not intersect the window are never opened; within an
//! intersecting file only the needed span is decoded. The walk stops at
//! the first file past the window — the key ordering makes that early
//! exit sound.
//!
//! Per-file failures never fail the page: an unreadable or malformed
//! file is skipped with a warning and the page simply comes up short,
//! matching the browser's tolerance for imperfect bulk imports.

use crate::error::{FlatpageError, Result};
use crate::formats;
use crate::index::{Catalog, IndexEntry, Predicate};
use crate::paging::{PageCache, PageRequest, PageResult, SearchContent};
use crate::types::Dataset;

/// Server-side cap on caller-supplied page sizes.
///
/// Bounds the file spans one request can force open; larger requests
/// are clamped, not rejected.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// The only field the key index can filter on
const SEARCH_FIELD: &str = "genome_id";

/// One file's intersection with the requested window (in-file rows,
/// 0-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileSpan {
    /// Position of the file in the matching list
    file: usize,
    /// First needed row within the file
    start: u64,
    /// Last needed row within the file
    end: u64,
}

/// Pages one dataset out of one catalog.
///
/// Holds only borrows: the catalog is immutable after load and the
/// optional cache is internally synchronized, so a `Pager` is cheap to
/// construct per request or to share across threads.
///
/// # Examples
///
/// ```no_run
/// use flatpage::index::Catalog;
/// use flatpage::paging::{PageCache, PageRequest, Pager};
/// use flatpage::types::Dataset;
///
/// # fn main() -> flatpage::Result<()> {
/// let catalog = Catalog::from_path("bacteria.mag.proteins.idx")?;
/// let cache = PageCache::new();
/// let pager = Pager::new(&catalog, Dataset::Proteins).with_cache(&cache);
///
/// let page = pager.page(&PageRequest::new(2, 20).with_search("genome_id", "GCF_0001"))?;
/// println!("{} of {} rows", page.rows.len(), page.total_count);
/// # Ok(())
/// # }
/// ```
pub struct Pager<'a> {
    catalog: &'a Catalog,
    dataset: Dataset,
    cache: Option<&'a PageCache>,
}

impl<'a> Pager<'a> {
    /// Pager over `catalog`, decoding rows as `dataset`.
    pub fn new(catalog: &'a Catalog, dataset: Dataset) -> Self {
        Pager {
            catalog,
            dataset,
            cache: None,
        }
    }

    /// Attach a result cache.
    ///
    /// Purely an optimization: results are identical with or without it.
    pub fn with_cache(mut self, cache: &'a PageCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Serve one page request.
    ///
    /// # Errors
    ///
    /// - [`FlatpageError::InvalidPagination`] if `current` or `pageSize`
    ///   is zero
    /// - [`FlatpageError::InvalidPredicate`] if the search names an
    ///   unsupported field
    ///
    /// A page past the end of the data and a search matching nothing are
    /// both valid empty results, not errors. Per-file read failures are
    /// contained (see module docs).
    pub fn page(&self, request: &PageRequest) -> Result<PageResult> {
        let page = request.pagination.current;
        let requested_size = request.pagination.page_size;
        if page == 0 {
            return Err(FlatpageError::InvalidPagination {
                msg: "page numbers are 1-based, got 0".to_string(),
            });
        }
        if requested_size == 0 {
            return Err(FlatpageError::InvalidPagination {
                msg: "page size must be at least 1".to_string(),
            });
        }
        let page_size = requested_size.min(MAX_PAGE_SIZE);

        let predicate = predicate_for(request.search_content.as_ref())?;

        if let Some(cache) = self.cache {
            if let Some(hit) = cache.get(&predicate, page, page_size) {
                return Ok(hit);
            }
        }

        let files = self.catalog.lookup(&predicate);
        let result = self.assemble(&files, page, page_size);

        if let Some(cache) = self.cache {
            cache.put(&predicate, page, page_size, result.clone());
        }

        Ok(result)
    }

    /// Compute the window, read the intersecting spans, and build the page.
    fn assemble(&self, files: &[&IndexEntry], page: u64, page_size: u64) -> PageResult {
        let total_count: u64 = files.iter().map(|f| f.row_count).sum();

        // Overflowing arithmetic means the window starts far past any
        // real data; serve the same empty page an out-of-range request
        // gets.
        let start_global = (page - 1).checked_mul(page_size).unwrap_or(u64::MAX);

        let mut rows = Vec::new();
        if total_count > 0 && start_global < total_count {
            let end_global = (start_global + page_size - 1).min(total_count - 1);

            for span in file_spans(files, start_global, end_global) {
                let entry = files[span.file];
                let wanted = span.end - span.start + 1;

                match formats::read_row_range(self.dataset, &entry.file_path, span.start, wanted) {
                    Ok(mut slice) => {
                        if (slice.len() as u64) < wanted {
                            tracing::warn!(
                                key = %entry.key,
                                path = ?entry.file_path,
                                indexed_rows = entry.row_count,
                                got = slice.len(),
                                wanted,
                                "row count drift: file is shorter than its index entry"
                            );
                        }
                        rows.append(&mut slice);
                    }
                    Err(e) => {
                        tracing::warn!(
                            key = %entry.key,
                            path = ?entry.file_path,
                            error = %e,
                            "skipping file for this page"
                        );
                    }
                }

                // Drifted counts could overfill the page; cap defensively.
                if rows.len() as u64 >= page_size {
                    rows.truncate(page_size as usize);
                    break;
                }
            }
        }

        PageResult {
            total_count,
            page,
            page_size,
            rows,
        }
    }
}

/// Translate the request's search into an index predicate.
fn predicate_for(search: Option<&SearchContent>) -> Result<Predicate> {
    match search {
        None => Ok(Predicate::All),
        Some(search) if search.field != SEARCH_FIELD => Err(FlatpageError::InvalidPredicate {
            field: search.field.clone(),
        }),
        Some(search) if search.value.is_empty() => Ok(Predicate::All),
        Some(search) => Ok(Predicate::KeyContains(search.value.clone())),
    }
}

/// Files intersecting global window `[start_global, end_global]`, with
/// the in-file row span each contributes.
///
/// Single pass in file order, maintaining the running offset of each
/// file's first row. A file is relevant iff its range intersects the
/// window; the walk ends at the first file wholly past it.
fn file_spans(files: &[&IndexEntry], start_global: u64, end_global: u64) -> Vec<FileSpan> {
    let mut spans = Vec::new();
    let mut offset = 0u64;

    for (file, entry) in files.iter().enumerate() {
        if offset > end_global {
            break;
        }
        if entry.row_count == 0 {
            continue;
        }
        let file_end = offset + entry.row_count - 1;
        if file_end >= start_global {
            spans.push(FileSpan {
                file,
                start: start_global.saturating_sub(offset),
                end: (end_global - offset).min(entry.row_count - 1),
            });
        }
        offset += entry.row_count;
    }

    spans
}
