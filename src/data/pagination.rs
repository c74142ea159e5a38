//! Pagination and category filtering over an in-memory collection.
//!
//! # Algorithm
//! ```text
//! raw page/limit → leading-integer parse → reject < 1
//!     → optional case-insensitive category filter (empty → 404)
//!     → total_pages = ceil(total / limit)
//!     → reject page > total_pages
//!     → slice [(page - 1) * limit, page * limit)
//! ```
//!
//! The engine is pure: no I/O, no shared state, safe to call concurrently.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::ApiError;

/// Page number used when the query omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the query omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Records that can be filtered by category.
pub trait Categorized {
    /// The record's category, if it has one.
    fn category(&self) -> Option<&str>;
}

/// Upstream entries carry their category under `Category`.
impl Categorized for Value {
    fn category(&self) -> Option<&str> {
        self.get("Category").and_then(Value::as_str)
    }
}

/// Raw pagination input, exactly as it arrived on the query string.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
}

/// One page of filtered results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page.
    pub count: usize,
    /// Items after filtering.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

/// Reasons a page cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Page number and limit must be positive integers")]
    InvalidBounds,

    #[error("No data found for the specified category")]
    CategoryNotFound,

    #[error("Page number exceeds total number of pages")]
    PageOutOfRange,
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::CategoryNotFound => ApiError::NotFound(err.to_string()),
            PageError::InvalidBounds | PageError::PageOutOfRange => {
                ApiError::InvalidArgument(err.to_string())
            }
        }
    }
}

/// Filter `entries` by the request's category and return the requested page.
pub fn paginate<T: Categorized>(entries: Vec<T>, request: &PageRequest) -> Result<Page<T>, PageError> {
    let page = coerce_positive(request.page.as_deref(), DEFAULT_PAGE)?;
    let limit = coerce_positive(request.limit.as_deref(), DEFAULT_LIMIT)?;

    let filtered: Vec<T> = match request.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => {
            let wanted = category.to_lowercase();
            let matching: Vec<T> = entries
                .into_iter()
                .filter(|entry| {
                    entry
                        .category()
                        .map(|c| c.to_lowercase() == wanted)
                        .unwrap_or(false)
                })
                .collect();
            if matching.is_empty() {
                return Err(PageError::CategoryNotFound);
            }
            matching
        }
        None => entries,
    };

    let total = filtered.len();
    let total_pages = total.div_ceil(limit);

    // An empty unfiltered collection has zero pages, so page 1 is rejected too.
    if page > total_pages {
        return Err(PageError::PageOutOfRange);
    }

    let start = (page - 1).saturating_mul(limit);
    let data: Vec<T> = filtered.into_iter().skip(start).take(limit).collect();

    Ok(Page {
        count: data.len(),
        total,
        page,
        total_pages,
        data,
    })
}

/// Resolve an optional raw value to an integer >= 1.
fn coerce_positive(raw: Option<&str>, default: i64) -> Result<usize, PageError> {
    let value = match raw {
        None => default,
        Some(raw) => parse_leading_int(raw).ok_or(PageError::InvalidBounds)?,
    };
    if value < 1 {
        return Err(PageError::InvalidBounds);
    }
    usize::try_from(value).map_err(|_| PageError::InvalidBounds)
}

/// Parse the leading integer of `input`: optional whitespace, optional sign,
/// then digits. Anything after the digits is ignored (`"3abc"` → 3).
fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    // Overflowing input saturates; it is rejected or clamped by the caller.
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
