//! Cache key construction, TTL policy, and the read-through wrapper.
//!
//! Only "small" result pages are worth holding: the policy admits the first
//! page at the default page size and nothing else, bounding cache memory to
//! one entry per user and category plus the per-window statistics.

mod key;
mod read_through;

pub use key::{
    CacheCategory, CacheKey, CacheKeyValidationError, ParseCacheCategoryError, cache_key,
    user_pattern,
};
pub use read_through::ReadThroughCache;

use pagination::PageParams;

/// Whether a page window is eligible for caching.
///
/// Larger offsets and limits bypass the cache entirely; they are rare,
/// unbounded in number, and cheap enough to recompute.
pub fn cacheable_page(page: &PageParams) -> bool {
    page.is_default_first_page()
}

/// Suffix scoping a cached list page by its window parameters.
pub fn page_suffix(page: &PageParams) -> String {
    format!("limit:{}:offset:{}", page.limit(), page.offset())
}

/// Suffix scoping cached social statistics by the lookback window.
pub fn window_suffix(days: i64) -> String {
    format!("days:{days}")
}
