// src/api/pagination.rs
//! Cursor pagination as a plain synchronous loop.

use super::types::{PaginatedResponse, PaginationResult};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::Result;

/// Calls `fetch_fn(page_size, cursor)` until the API reports no more
/// results or `max_pages` pages were fetched.
pub fn fetch_all_pages<T, F>(
    mut fetch_fn: F,
    page_size: Option<u32>,
    max_pages: Option<u32>,
) -> Result<PaginationResult<T>>
where
    F: FnMut(u32, Option<String>) -> Result<PaginatedResponse<T>>,
{
    let page_size = page_size.unwrap_or(NOTION_API_PAGE_SIZE);
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(page_size, cursor)?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);
        pages_fetched += 1;

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(PaginationResult {
        total_fetched: all_items.len(),
        items: all_items,
        pages_fetched,
    })
}
