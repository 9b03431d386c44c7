//! Response envelopes and pagination math.
//!
//! Two shapes coexist on the wire: lookups and derived views answer with
//! [`ApiResponse`], listings answer with [`Paginated`].

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_LIMIT, DEFAULT_PAGE};

/// `{success, message, data}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Pagination metadata attached to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// Build metadata for a page, with `pages = ceil(total / limit)`.
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// `{data, pagination}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            pagination: Pagination::new(request, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// A validated page request. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Interpret raw query values. Absent, non-numeric or zero values fall
    /// back to the defaults; there is no upper bound on `limit`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            limit: positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}

/// The first few records of a collection together with its full size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSlice<T> {
    pub data: Vec<T>,
    pub showing: usize,
    pub total: u64,
    pub has_more: bool,
}

impl<T> RecentSlice<T> {
    /// `has_more` is true when the collection holds more than `cap` records.
    pub fn new(data: Vec<T>, total: u64, cap: u32) -> Self {
        Self {
            showing: data.len(),
            data,
            total,
            has_more: total > u64::from(cap),
        }
    }
}
