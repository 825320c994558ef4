//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum results to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
        }
    }
}

/// Select the 1-based `page` of `items` with `page_size` items per page.
///
/// Returns `None` when the page does not exist: page zero, or a page past the
/// end of a non-empty result set. Page 1 of an empty set is the empty slice.
pub fn page_slice<T>(items: &[T], page: u64, page_size: u64) -> Option<&[T]> {
    if page == 0 {
        return None;
    }

    let start = (page - 1).checked_mul(page_size)? as usize;
    let end = start.saturating_add(page_size as usize).min(items.len());

    if start == 0 {
        return Some(&items[..end]);
    }

    if start >= items.len() {
        return None;
    }

    Some(&items[start..end])
}
