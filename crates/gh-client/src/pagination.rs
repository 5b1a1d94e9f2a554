//! Page-following for list endpoints
//!
//! GitHub list endpoints return `total_count` alongside one page of items.
//! `collect_pages` keeps requesting pages until every item has been seen and
//! hands back one ordered sequence, so callers never observe a partial page.

use std::future::Future;

/// Items requested per page (GitHub's maximum)
pub const PER_PAGE: u8 = 100;

/// One page of a list endpoint
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page, in API order
    pub items: Vec<T>,
    /// Total number of items across all pages as reported by the API
    pub total_count: u64,
}

/// Fetch every page via `fetch(page_number)` and concatenate the results
///
/// Page numbers start at 1. Iteration stops at the first empty or short page,
/// or once `total_count` items have been collected.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> anyhow::Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = anyhow::Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_num = 1u32;

    loop {
        let page = fetch(page_num).await?;
        let fetched = page.items.len();
        items.extend(page.items);

        if fetched < PER_PAGE as usize || items.len() as u64 >= page.total_count {
            break;
        }

        page_num += 1;
    }

    Ok(items)
}
