//! Shared response schema types for the HTTP surface.

use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope documented for every failure response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    pub code: String,
    /// Human-readable message.
    #[schema(example = "an active sleep session already exists")]
    pub message: String,
    /// Optional field-level detail for validation failures.
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Pagination metadata rendered alongside every list response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoBody {
    pub total: i64,
    pub count: i64,
    pub has_more: bool,
    pub next_offset: Option<i64>,
    pub previous_offset: Option<i64>,
}

impl From<PageInfo> for PageInfoBody {
    fn from(value: PageInfo) -> Self {
        Self {
            total: value.total,
            count: value.count,
            has_more: value.has_more,
            next_offset: value.next_offset,
            previous_offset: value.previous_offset,
        }
    }
}
