//! Page window over the filtered view.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Current page index (zero-based) and rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

/// Snapshot of the paginator for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub page_count: usize,
}

impl PageInfo {
    /// One-based index of the first row on the page (0 when the page is empty)
    #[must_use]
    pub fn first_item(&self) -> usize {
        let start = self.current_page.saturating_mul(self.page_size);
        if start >= self.total_items {
            0
        } else {
            start + 1
        }
    }

    /// One-based index of the last row on the page (0 when the page is empty)
    #[must_use]
    pub fn last_item(&self) -> usize {
        if self.first_item() == 0 {
            0
        } else {
            (self.first_item() - 1 + self.page_size).min(self.total_items)
        }
    }
}

impl Pagination {
    /// Start at page 0. Zero page sizes are raised to one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Pagination {
            current_page: 0,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.current_page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Change the page size, keeping the first visible row on screen
    pub fn set_page_size(&mut self, page_size: usize) -> StoreResult<()> {
        if page_size == 0 {
            return Err(StoreError::InvalidPageSize(page_size));
        }
        let first_row = self.current_page.saturating_mul(self.page_size);
        self.page_size = page_size;
        self.current_page = first_row / page_size;
        Ok(())
    }

    /// Number of pages needed for `total` rows (zero rows need zero pages)
    #[must_use]
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Index range of the current page within `total` rows.
    ///
    /// Empty when the page starts past the end.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.current_page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Slice `items` to the current page
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.window(items.len())]
    }

    #[must_use]
    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: total,
            page_count: self.page_count(total),
        }
    }
}
