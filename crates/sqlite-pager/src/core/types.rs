use serde::{Deserialize, Serialize};

pub type DbRow = std::collections::HashMap<String, serde_json::Value>;

/// What the caller asks for: a 1-based page and a desired page size.
///
/// The size is only a wish; the pager clamps it to its configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub current_page: u64,
    #[serde(default)]
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(current_page: u64, page_size: u64) -> Self {
        Self {
            current_page,
            page_size,
        }
    }
}

/// Skip/take pair handed to the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// One bounded slice of a result set plus the metadata needed to walk it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Page that was served.
    pub current_page: u64,
    /// Effective page size, after clamping.
    pub page_size: u64,
    /// Rows matching the query across all pages.
    pub total_entries: u64,
    /// Never less than one, even for an empty result.
    pub total_pages: u64,
    /// Page to request next; wraps to 1 after the last page.
    pub next_page: u64,
    /// Number of rows in `data`.
    pub entries_count: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}
