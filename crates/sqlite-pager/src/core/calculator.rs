use crate::{
    core::{
        limits::PageBounds,
        types::{Page, PageRequest, Window},
    },
    error::{AppError, AppResult},
};

pub use crate::core::limits::clamp_page_size;

/// Pagination arithmetic for one pager's bounds.
#[derive(Debug, Clone, Copy)]
pub struct PageCalculator {
    bounds: PageBounds,
}

/// A validated request, ready for the bounded fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub current_page: u64,
    pub page_size: u64,
    pub total_entries: u64,
    pub total_pages: u64,
}

impl PageCalculator {
    pub fn new(bounds: PageBounds) -> Self {
        Self { bounds }
    }

    /// Clamps the page size, derives the page count and rejects pages past the end.
    pub fn plan(&self, request: PageRequest, total_entries: u64) -> AppResult<PagePlan> {
        check_request(request)?;
        let page_size = self.bounds.clamp(request.page_size);
        let total_pages = compute_total_pages(total_entries, page_size);
        validate_page(request.current_page, total_pages)?;
        Ok(PagePlan {
            current_page: request.current_page,
            page_size,
            total_entries,
            total_pages,
        })
    }
}

impl PagePlan {
    pub fn window(&self) -> Window {
        Window {
            offset: offset(self.current_page, self.page_size),
            limit: self.page_size,
        }
    }

    pub fn finalize<T>(self, data: Vec<T>) -> Page<T> {
        let entries_count = compute_entries_count(&data);
        Page {
            current_page: self.current_page,
            page_size: self.page_size,
            total_entries: self.total_entries,
            total_pages: self.total_pages,
            next_page: compute_next_page(self.current_page, self.total_pages, entries_count),
            entries_count,
            data,
        }
    }
}

/// Pages are 1-based; page 0 would turn into a negative offset.
pub fn check_request(request: PageRequest) -> AppResult<()> {
    if request.current_page == 0 {
        return Err(AppError::InvalidRequest(
            "current_page must be at least 1".into(),
        ));
    }
    Ok(())
}

pub fn compute_total_pages(total_entries: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total_entries.div_ceil(page_size).max(1)
}

pub fn validate_page(current_page: u64, total_pages: u64) -> AppResult<()> {
    if current_page > total_pages {
        return Err(AppError::PageNotExists {
            current_page,
            total_pages,
        });
    }
    Ok(())
}

pub fn compute_next_page(current_page: u64, total_pages: u64, entries_returned: u64) -> u64 {
    if entries_returned == 0 || current_page == total_pages {
        return 1;
    }
    current_page + 1
}

pub fn compute_entries_count<T>(items: &[T]) -> u64 {
    items.len() as u64
}

pub fn offset(current_page: u64, page_size: u64) -> u64 {
    current_page.saturating_sub(1).saturating_mul(page_size)
}
