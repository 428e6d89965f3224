//! Page-window math and the listing response envelope.
//!
//! Listings resolve a page window first (count query), then fetch one page
//! with LIMIT/OFFSET. The window math reproduces the paginator contract the
//! API's callers rely on: out-of-range requests are clamped to the last page
//! so a slice can always be produced, and *then* the originally requested
//! page number is compared against the total — asking past the end is still
//! an error. Requests below page 1 clamp to the last page and succeed.
use serde::Serialize;
use thiserror::Error;

use crate::error::AppError;

/// Page size for unscoped/global feed listings
pub const GLOBAL_PAGE_SIZE: i64 = 24;

/// Page size for group-scoped listings and search results
pub const SCOPED_PAGE_SIZE: i64 = 12;

/// The requested page lies past the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("that page is out of range")]
pub struct PageOutOfRange;

impl From<PageOutOfRange> for AppError {
    fn from(err: PageOutOfRange) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Resolved window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub now_page: i64,
    pub total_pages: i64,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Resolve `requested_page` against a result set of `count` items.
///
/// `total_pages` is never below 1: an empty set reports page 1 of 1 with
/// zero items.
pub fn resolve_page(
    count: i64,
    page_size: i64,
    requested_page: i64,
) -> Result<PageWindow, PageOutOfRange> {
    debug_assert!(page_size > 0);

    let total_pages = if count <= 0 {
        1
    } else {
        (count + page_size - 1) / page_size
    };

    // Clamp first so there is always a servable page, then reject callers
    // that asked past the end.
    let now_page = if (1..=total_pages).contains(&requested_page) {
        requested_page
    } else {
        total_pages
    };
    if requested_page > total_pages {
        return Err(PageOutOfRange);
    }

    Ok(PageWindow {
        now_page,
        total_pages,
        count,
        limit: page_size,
        offset: (now_page - 1) * page_size,
    })
}

/// Listing envelope: `{ total_pages, now_page, count, results }`
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total_pages: i64,
    pub now_page: i64,
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, results: Vec<T>) -> Self {
        Self {
            total_pages: window.total_pages,
            now_page: window.now_page,
            count: window.count,
            results,
        }
    }

    /// Envelope for a listing that never ran a query (empty search keyword)
    pub fn empty() -> Self {
        Self {
            total_pages: 1,
            now_page: 1,
            count: 0,
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_items_at_page_size_24_span_three_pages() {
        let window = resolve_page(50, GLOBAL_PAGE_SIZE, 1).unwrap();
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.now_page, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 24);

        let last = resolve_page(50, GLOBAL_PAGE_SIZE, 3).unwrap();
        assert_eq!(last.offset, 48);
    }

    #[test]
    fn page_past_the_end_is_rejected() {
        assert_eq!(resolve_page(50, GLOBAL_PAGE_SIZE, 4), Err(PageOutOfRange));
    }

    #[test]
    fn page_below_one_serves_the_last_page() {
        let window = resolve_page(50, GLOBAL_PAGE_SIZE, 0).unwrap();
        assert_eq!(window.now_page, 3);
        let window = resolve_page(50, GLOBAL_PAGE_SIZE, -7).unwrap();
        assert_eq!(window.now_page, 3);
    }

    #[test]
    fn empty_result_set_reports_one_empty_page() {
        let window = resolve_page(0, SCOPED_PAGE_SIZE, 1).unwrap();
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.now_page, 1);
        assert_eq!(window.count, 0);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn page_two_of_an_empty_set_is_out_of_range() {
        assert_eq!(resolve_page(0, SCOPED_PAGE_SIZE, 2), Err(PageOutOfRange));
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let window = resolve_page(24, GLOBAL_PAGE_SIZE, 1).unwrap();
        assert_eq!(window.total_pages, 1);
        assert_eq!(resolve_page(24, GLOBAL_PAGE_SIZE, 2), Err(PageOutOfRange));
    }
}
