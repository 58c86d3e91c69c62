//! Virtual pagination over catalogued flat files.
//!
//! A page request names a 1-based page, a page size, and an optional
//! key search. The [`Pager`] resolves it against the global ordering of
//! all matching files' rows — key-ascending across files, line order
//! within a file — reading only the file spans the page intersects.
//!
//! The wire shapes here are the browser's existing request/response
//! contract:
//!
//! ```json
//! { "pagination": { "current": 2, "pageSize": 20 },
//!   "searchContent": { "field": "genome_id", "value": "GCF_0001" } }
//! ```
//!
//! ```json
//! { "count": 4812, "page": 2, "page_size": 20, "results": [ ... ] }
//! ```

pub mod cache;
pub mod pager;

use serde::{Deserialize, Serialize};

use crate::formats::Row;

pub use cache::{Clock, PageCache, SystemClock, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL};
pub use pager::{Pager, MAX_PAGE_SIZE};

/// Pagination parameters of a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Requested page, 1-based
    pub current: u64,
    /// Rows per page
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

/// Key search attached to a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchContent {
    /// Field to filter on; only the partition key field is searchable
    pub field: String,
    /// Substring to match
    pub value: String,
}

/// One page request, as received from the browser frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number and size
    pub pagination: Pagination,
    /// Optional key search; absent means every file matches
    #[serde(rename = "searchContent", default, skip_serializing_if = "Option::is_none")]
    pub search_content: Option<SearchContent>,
}

impl PageRequest {
    /// Request a page with no search filter.
    pub fn new(page: u64, page_size: u64) -> Self {
        PageRequest {
            pagination: Pagination {
                current: page,
                page_size,
            },
            search_content: None,
        }
    }

    /// Attach a key search to the request.
    pub fn with_search(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_content = Some(SearchContent {
            field: field.into(),
            value: value.into(),
        });
        self
    }
}

/// One assembled page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    /// Total matching rows across all matching files
    #[serde(rename = "count")]
    pub total_count: u64,
    /// Page that was served, 1-based
    pub page: u64,
    /// Effective page size (after capping)
    pub page_size: u64,
    /// The page's rows, in global order; shorter than `page_size` only
    /// on the final page, past the end, or after a skipped file
    #[serde(rename = "results")]
    pub rows: Vec<Row>,
}
