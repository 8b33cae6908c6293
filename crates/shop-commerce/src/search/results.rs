//! Search results and pagination.

use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Get start item number (1-indexed, 0 when empty).
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page.saturating_sub(1) * self.per_page + 1).min(self.total)
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        (self.page * self.per_page).min(self.total)
    }

    /// Items after the current page ("Load More (n remaining)").
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.end_item())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, super::DEFAULT_PAGE_SIZE, 0)
    }
}

/// Search results container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    /// The result items.
    pub items: Vec<T>,
    /// Pagination info.
    pub pagination: Pagination,
}

impl<T> SearchResults<T> {
    /// Create new search results.
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Create empty results.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 9, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.remaining(), 0);
        assert!(!p.has_next);
    }

    #[test]
    fn test_pagination_page_zero() {
        let p = Pagination::new(0, 9, 20);
        assert_eq!(p.page, 1);
        assert_eq!(p.start_item(), 1);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_pagination_item_range_and_remaining() {
        let p = Pagination::new(1, 9, 20);
        assert_eq!(p.start_item(), 1);
        assert_eq!(p.end_item(), 9);
        assert_eq!(p.remaining(), 11);
    }
}
