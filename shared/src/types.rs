//! Common types used across the service

use serde::{Deserialize, Serialize};

/// Default number of records shown per list page
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Build pagination from an optional requested page number
    pub fn new(page: Option<u32>, per_page: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.max(1),
        }
    }

    /// Move the page into the range that exists for `total_items` records
    pub fn clamp(self, total_items: u64) -> Self {
        let last = total_pages(total_items, self.per_page);
        Self {
            page: self.page.clamp(1, last),
            per_page: self.per_page,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total_items,
            total_pages: total_pages(total_items, pagination.per_page),
        }
    }

    /// More than one page exists
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        (self.page + 1).min(self.total_pages)
    }
}

/// Number of pages needed for `total_items`; an empty list still has one page
fn total_pages(total_items: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_items.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_has_single_page() {
        let meta = PaginationMeta::new(Pagination::default(), 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.is_paginated());
        assert!(!meta.has_previous());
        assert!(!meta.has_next());
    }

    #[test]
    fn test_offset_and_limit() {
        let pagination = Pagination::new(Some(3), 5);
        assert_eq!(pagination.limit(), 5);
        assert_eq!(pagination.offset(), 10);
    }

    #[test]
    fn test_page_zero_becomes_first_page() {
        assert_eq!(Pagination::new(Some(0), 5).page, 1);
        assert_eq!(Pagination::new(None, 0).per_page, 1);
    }

    #[test]
    fn test_clamp_to_last_page() {
        let pagination = Pagination::new(Some(10), 5).clamp(11);
        assert_eq!(pagination.page, 3);

        let meta = PaginationMeta::new(pagination, 11);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_previous());
        assert!(!meta.has_next());
        assert_eq!(meta.previous_page(), 2);
    }

    #[test]
    fn test_middle_page_navigation() {
        let meta = PaginationMeta::new(Pagination::new(Some(2), 5), 12);
        assert!(meta.is_paginated());
        assert_eq!(meta.previous_page(), 1);
        assert_eq!(meta.next_page(), 3);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_clamped_page_is_in_range(
                page in 0u32..1000,
                per_page in 1u32..50,
                total in 0u64..10_000,
            ) {
                let pagination = Pagination::new(Some(page), per_page).clamp(total);
                let meta = PaginationMeta::new(pagination, total);

                prop_assert!(meta.page >= 1);
                prop_assert!(meta.page <= meta.total_pages);
                prop_assert!((pagination.offset() as u64) < total.max(1));
                prop_assert_eq!(meta.has_next(), meta.page < meta.total_pages);
            }

            #[test]
            fn prop_pages_cover_every_item(per_page in 1u32..50, total in 0u64..10_000) {
                let meta = PaginationMeta::new(Pagination::new(None, per_page), total);
                let capacity = u64::from(meta.total_pages) * u64::from(per_page);

                prop_assert!(capacity >= total);
                prop_assert!(capacity < total + u64::from(per_page) || total == 0);
            }
        }
    }
}
