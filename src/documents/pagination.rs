//! Order line pagination
//!
//! Splits delivery-note lines into fixed-capacity pages. The first page
//! shrinks when special requests have to share it with the line table.

use serde::Serialize;

/// Lines on the first page when special requests are printed
pub const REDUCED_FIRST_PAGE_CAPACITY: usize = 8;
/// Lines on the first page otherwise
pub const FIRST_PAGE_CAPACITY: usize = 12;
/// Lines on every page after the first
pub const PAGE_CAPACITY: usize = 12;

/// One printed page of a delivery note
///
/// Every page of a single pagination call carries the same `total_pages`,
/// and `page_number` is 1-based (later pages run 2..=total_pages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub first_page: bool,
    pub page_number: usize,
    pub total_pages: usize,
    pub lines: Vec<T>,
}

/// Split `lines` into pages without reordering them
///
/// An empty input still yields a single (empty) first page so templates can
/// print the header and footer.
pub fn paginate<T>(lines: Vec<T>, reduced_first_page: bool) -> Vec<Page<T>> {
    let first_capacity = if reduced_first_page {
        REDUCED_FIRST_PAGE_CAPACITY
    } else {
        FIRST_PAGE_CAPACITY
    };

    let mut pages = Vec::new();
    let mut remaining = lines.into_iter().peekable();

    let first: Vec<T> = remaining.by_ref().take(first_capacity).collect();
    pages.push(Page {
        first_page: true,
        page_number: 1,
        total_pages: 0,
        lines: first,
    });

    while remaining.peek().is_some() {
        let chunk: Vec<T> = remaining.by_ref().take(PAGE_CAPACITY).collect();
        pages.push(Page {
            first_page: false,
            page_number: pages.len() + 1,
            total_pages: 0,
            lines: chunk,
        });
    }

    // Backfill once the page count is known
    let total = pages.len();
    for page in &mut pages {
        page.total_pages = total;
    }

    pages
}
