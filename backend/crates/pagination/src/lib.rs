//! Limit/offset pagination primitives shared by drowse backend endpoints.
//!
//! Endpoints accept a bounded page window and return a [`Page`] envelope
//! carrying the slice plus [`PageInfo`] metadata (total count, has-more flag,
//! and neighbouring offsets). Bounds live here so HTTP adapters, domain
//! services, and persistence adapters agree on what a valid window is.

use serde::{Deserialize, Serialize};

/// Default number of items returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: i64 = 20;
/// Smallest accepted page size.
pub const MIN_LIMIT: i64 = 1;
/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Errors raised when constructing [`PageParams`] from caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    /// Requested limit falls outside the accepted `[MIN_LIMIT, MAX_LIMIT]` range.
    #[error("limit must be between {min} and {max} (got {got})")]
    LimitOutOfRange {
        /// Smallest accepted limit.
        min: i64,
        /// Largest accepted limit.
        max: i64,
        /// Limit the caller asked for.
        got: i64,
    },
    /// Requested offset is negative.
    #[error("offset must not be negative (got {got})")]
    NegativeOffset {
        /// Offset the caller asked for.
        got: i64,
    },
}

/// A validated limit/offset window.
///
/// Construction enforces the shared bounds; once built the window is
/// immutable. The default window (`DEFAULT_LIMIT` at offset zero) is the only
/// window eligible for caching upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageParamsDto", into = "PageParamsDto")]
pub struct PageParams {
    limit: i64,
    offset: i64,
}

impl PageParams {
    /// Validate and construct a page window.
    ///
    /// # Errors
    /// Returns [`PageParamsError`] when the limit falls outside
    /// `[MIN_LIMIT, MAX_LIMIT]` or the offset is negative.
    pub const fn new(limit: i64, offset: i64) -> Result<Self, PageParamsError> {
        if limit < MIN_LIMIT || limit > MAX_LIMIT {
            return Err(PageParamsError::LimitOutOfRange {
                min: MIN_LIMIT,
                max: MAX_LIMIT,
                got: limit,
            });
        }
        if offset < 0 {
            return Err(PageParamsError::NegativeOffset { got: offset });
        }
        Ok(Self { limit, offset })
    }

    /// Construct a window from optional caller inputs, applying defaults.
    ///
    /// # Errors
    /// Returns [`PageParamsError`] when a provided value is out of bounds.
    pub const fn from_options(
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Self, PageParamsError> {
        let limit = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        let offset = match offset {
            Some(value) => value,
            None => 0,
        };
        Self::new(limit, offset)
    }

    /// Maximum number of items the page may hold.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Whether this is the first page at the default page size.
    ///
    /// Upstream cache policy only stores this window; larger or shifted
    /// windows always recompute.
    #[must_use]
    pub const fn is_default_first_page(&self) -> bool {
        self.offset == 0 && self.limit == DEFAULT_LIMIT
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Wire representation used to validate deserialised page parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PageParamsDto {
    limit: i64,
    offset: i64,
}

impl From<PageParams> for PageParamsDto {
    fn from(value: PageParams) -> Self {
        Self {
            limit: value.limit,
            offset: value.offset,
        }
    }
}

impl TryFrom<PageParamsDto> for PageParams {
    type Error = PageParamsError;

    fn try_from(value: PageParamsDto) -> Result<Self, Self::Error> {
        Self::new(value.limit, value.offset)
    }
}

/// Pagination metadata describing a returned page relative to the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total matching items across all pages.
    pub total: i64,
    /// Items actually returned in this page.
    pub count: i64,
    /// Whether items exist past the end of this page.
    pub has_more: bool,
    /// Offset of the next page, when one exists.
    pub next_offset: Option<i64>,
    /// Offset of the previous page, when this page is not the first.
    pub previous_offset: Option<i64>,
}

impl PageInfo {
    /// Derive page metadata from the total count, the returned count, and the
    /// window that produced the page.
    #[must_use]
    pub const fn compute(total: i64, returned: i64, params: PageParams) -> Self {
        let has_more = params.offset + returned < total;
        let next_offset = if has_more {
            Some(params.offset + params.limit)
        } else {
            None
        };
        let previous_offset = if params.offset > 0 {
            Some(params.offset.saturating_sub(params.limit))
        } else {
            None
        };
        Self {
            total,
            count: returned,
            has_more,
            next_offset,
            previous_offset,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in page order.
    pub items: Vec<T>,
    /// Metadata relating this page to the full result set.
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Build a page envelope from items, the total count, and the window.
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        let returned = i64::try_from(items.len()).unwrap_or(i64::MAX);
        Self {
            items,
            info: PageInfo::compute(total, returned, params),
        }
    }

    /// An empty page for a zero-item result set.
    #[must_use]
    pub fn empty(params: PageParams) -> Self {
        Self::new(Vec::new(), 0, params)
    }
}
