//! Pagination engine.
//!
//! Stateless page arithmetic shared by the route reactor (which turns the
//! `page` query parameter into a page number) and the local gateway (which
//! slices the in-memory repository).
//!
//! Invalid input never fails: an absent, non-numeric, or non-positive page
//! request resolves to page 1. There is deliberately no upper clamp; a page
//! past the end yields an empty slice.

use crate::content::{Article, PaginationResult};

/// Page used whenever the requested page is missing or invalid.
pub const DEFAULT_PAGE: usize = 1;

/// Interpret a raw `page` query value.
///
/// Accepts surrounding whitespace; anything that is not a positive integer
/// (including `"0"`, `"-2"`, `"abc"`, `"1.5"`) becomes [`DEFAULT_PAGE`].
pub fn parse_requested_page(requested: Option<&str>) -> usize {
    requested
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|&page| page > 0)
        .and_then(|page| usize::try_from(page).ok())
        .unwrap_or(DEFAULT_PAGE)
}

/// Compute the current page for a listing.
///
/// With no items the current page is always 1. Otherwise the parsed request
/// is returned unchanged, even when it lies beyond the last page.
pub fn compute_current_page(
    requested: Option<&str>,
    total_items: usize,
    items_per_page: usize,
) -> usize {
    if total_items == 0 || items_per_page == 0 {
        return DEFAULT_PAGE;
    }
    parse_requested_page(requested)
}

/// Number of pages needed to show `total_items` (0 when there are none).
pub fn page_count(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page)
}

/// `page N/M` label. An empty listing still reads `page 1/1`; a page past
/// the end is shown as requested.
pub fn page_indicator(current: usize, pages: usize) -> String {
    format!("page {}/{}", current, pages.max(1))
}

/// Slice `items` into the requested page, json-server style.
///
/// `page` and `per_page` must already be validated (≥ 1); the gateway rejects
/// zero values before calling this.
pub fn paginate(items: &[Article], page: usize, per_page: usize) -> PaginationResult {
    let total_items = items.len();
    let pages = page_count(total_items, per_page);
    let current_page = if total_items == 0 { DEFAULT_PAGE } else { page };

    let start = (current_page - 1).saturating_mul(per_page);
    let articles = if start >= total_items {
        Vec::new()
    } else {
        let end = start.saturating_add(per_page).min(total_items);
        items[start..end].to_vec()
    };

    PaginationResult {
        current_page,
        per_page,
        total_items,
        pages,
        first: 1,
        last: pages.max(1),
        next: (current_page < pages).then_some(current_page + 1),
        prev: (current_page > 1).then_some(current_page - 1),
        articles,
    }
}

// ============================================================================
// Tests
// ============================================================================
