use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            page: None,
            page_size: None,
        }
    }

    pub fn paged(total: i64, page: PageRequest) -> Self {
        Self {
            total,
            page: Some(page.page),
            page_size: Some(page.page_size),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Raw pagination query parameters.
///
/// Values are kept as strings so that garbage input falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,

    /// Number of items per page (default: 10, max: 100)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 100)]
    pub page_size: Option<String>,
}

impl PaginationQuery {
    /// Whether the caller asked for pagination at all
    pub fn is_requested(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    pub fn to_page(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.page_size.as_deref())
    }
}

/// A resolved, always-valid page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Non-positive or unparsable values silently become the defaults
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = positive_or(page, 1);
        let page_size = positive_or(page_size, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Number of records to skip; pages past the end of `i64` saturate
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
