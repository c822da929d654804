// ABOUTME: Cursor-based pagination module for stateless page traversal
// ABOUTME: Encodes page number and active filters into opaque, tamper-evident cursor tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stateless Cursor Pagination
//!
//! A cursor carries everything needed to resume a listing: the page number
//! and the filter set that produced the first page. No server-side state is
//! kept, so two independent processes decode the same token identically.
//!
//! Wire format: URL-safe base64 (no padding) of the compact JSON payload
//! `{"filters":{...},"page":N}` followed by the first
//! [`CURSOR_DIGEST_LEN`] bytes of its SHA-256 digest. Filters are stored in a
//! `BTreeMap`, so encoding the same page and filters always yields the same
//! token.
//!
//! Page boundaries are detected by over-fetching: callers request
//! `limit + 1` items from upstream and [`paginate`] reports `has_more` when the
//! extra item arrived, then trims the page back to `limit`.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{AppError, AppResult};

/// Number of digest bytes appended to the cursor payload
pub const CURSOR_DIGEST_LEN: usize = 8;

/// A single filter value. Only JSON scalars are representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// Integral JSON number
    Int(i64),
    /// Non-integral JSON number
    Float(f64),
    /// JSON string
    Text(String),
}

impl FilterValue {
    /// Borrow the value as a string slice when it is text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Read the value as an integer when it is integral
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Float(value) => value.is_finite(),
            _ => true,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(value.format("%Y-%m-%d").to_string())
    }
}

/// Filter set carried by a cursor, ordered by key
pub type CursorFilters = BTreeMap<String, FilterValue>;

/// Opaque pagination cursor token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Encode a page number and filter set into a cursor
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `page` is zero or a filter holds a
    /// non-finite number
    pub fn encode(page: u32, filters: &CursorFilters) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::invalid_argument(format!(
                "Cursor page must be >= 1, got {page}"
            )));
        }
        if let Some((key, _)) = filters.iter().find(|(_, value)| !value.is_finite()) {
            return Err(AppError::invalid_argument(format!(
                "Cursor filter '{key}' must be a finite number"
            )));
        }

        let payload = serde_json::to_vec(&EncodedPayload { filters, page })
            .map_err(|e| AppError::internal(format!("Failed to serialize cursor: {e}")))?;

        let mut bytes = payload.clone();
        bytes.extend_from_slice(&payload_digest(&payload));
        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Decode this cursor into its page number and filters
    ///
    /// # Errors
    ///
    /// Returns `InvalidCursor` if the token is not valid base64, was truncated
    /// or altered, lacks a page number, or carries a page below 1
    pub fn decode(&self) -> AppResult<PageCursor> {
        decode_cursor(&self.0)
    }

    /// Get the raw cursor string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize)]
struct EncodedPayload<'a> {
    filters: &'a CursorFilters,
    page: u32,
}

#[derive(Deserialize)]
struct DecodedPayload {
    page: Option<serde_json::Number>,
    #[serde(default)]
    filters: Option<CursorFilters>,
}

fn payload_digest(payload: &[u8]) -> [u8; CURSOR_DIGEST_LEN] {
    let digest = Sha256::digest(payload);
    let mut out = [0_u8; CURSOR_DIGEST_LEN];
    out.copy_from_slice(&digest[..CURSOR_DIGEST_LEN]);
    out
}

/// Position decoded from a cursor: which page to fetch and with which filters
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    /// One-based page number
    pub page: u32,
    /// Filters active when the first page was produced
    pub filters: CursorFilters,
}

impl PageCursor {
    /// Read a text filter
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.filters.get(key).and_then(FilterValue::as_str)
    }

    /// Read an integer filter
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        self.filters.get(key).and_then(FilterValue::as_i64)
    }
}

/// Encode a page number and filter set into a cursor token string
///
/// # Errors
///
/// Returns `InvalidArgument` if `page` is zero
pub fn encode_cursor(page: u32, filters: &CursorFilters) -> AppResult<String> {
    Cursor::encode(page, filters).map(|cursor| cursor.0)
}

/// Decode a cursor token string
///
/// Unknown payload keys are ignored; a missing `filters` key decodes to an
/// empty filter set.
///
/// # Errors
///
/// Returns `InvalidCursor` for any malformed, truncated, or tampered token
pub fn decode_cursor(token: &str) -> AppResult<PageCursor> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim())
        .map_err(|e| AppError::invalid_cursor(format!("Cursor is not valid base64: {e}")))?;

    if bytes.len() <= CURSOR_DIGEST_LEN {
        return Err(AppError::invalid_cursor("Cursor is truncated"));
    }
    let (payload, digest) = bytes.split_at(bytes.len() - CURSOR_DIGEST_LEN);
    if payload_digest(payload) != digest {
        return Err(AppError::invalid_cursor(
            "Cursor integrity check failed; it was altered or truncated",
        ));
    }

    let decoded: DecodedPayload = serde_json::from_slice(payload)
        .map_err(|e| AppError::invalid_cursor(format!("Cursor payload is malformed: {e}")))?;

    let page = decoded
        .page
        .ok_or_else(|| AppError::invalid_cursor("Cursor is missing the page number"))?;
    let page = page
        .as_i64()
        .filter(|page| *page >= 1)
        .and_then(|page| u32::try_from(page).ok())
        .ok_or_else(|| AppError::invalid_cursor(format!("Cursor page {page} is not valid")))?;

    Ok(PageCursor {
        page,
        filters: decoded.filters.unwrap_or_default(),
    })
}

/// Pagination block of a response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Cursor for the next page, present only when more pages exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
    /// Whether another page is available
    pub has_more: bool,
    /// Requested page size
    pub limit: u32,
    /// Items actually returned on this page
    pub returned: u32,
}

/// Build the pagination block for a page
///
/// When `has_more` is true the cursor points at `current_page + 1` with the
/// same filters; otherwise no cursor is produced.
///
/// # Errors
///
/// Returns `InvalidArgument` if `current_page` is zero
pub fn build_pagination_info(
    returned: u32,
    limit: u32,
    current_page: u32,
    has_more: bool,
    filters: &CursorFilters,
) -> AppResult<PaginationInfo> {
    if current_page < 1 {
        return Err(AppError::invalid_argument(format!(
            "Current page must be >= 1, got {current_page}"
        )));
    }
    let cursor = if has_more {
        Some(Cursor::encode(current_page.saturating_add(1), filters)?)
    } else {
        None
    };
    Ok(PaginationInfo {
        cursor,
        has_more,
        limit,
        returned: returned.min(limit),
    })
}

/// One page worth of query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// One-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Filters to carry into the next cursor
    pub filters: CursorFilters,
}

impl PageRequest {
    /// Request the first page
    #[must_use]
    pub const fn first(limit: u32, filters: CursorFilters) -> Self {
        Self {
            page: 1,
            limit,
            filters,
        }
    }

    /// Resume from a decoded cursor
    #[must_use]
    pub fn resume(cursor: PageCursor, limit: u32) -> Self {
        Self {
            page: cursor.page,
            limit,
            filters: cursor.filters,
        }
    }

    /// Zero-based index of the first item on this page
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Number of items to request upstream (`limit + 1`)
    #[must_use]
    pub const fn fetch_size(&self) -> u32 {
        self.limit.saturating_add(1)
    }

    /// Slice the fetch window out of a locally materialized list
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset() as usize).min(items.len());
        let end = start.saturating_add(self.fetch_size() as usize).min(items.len());
        &items[start..end]
    }
}

/// Items of one page together with its pagination block
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    /// The items in this page
    pub items: Vec<T>,
    /// Pagination metadata for the envelope
    pub pagination: PaginationInfo,
}

/// Turn an over-fetched batch into a page
///
/// `fetched` is expected to hold up to `limit + 1` items; the extra item only
/// signals that another page exists and is dropped.
///
/// # Errors
///
/// Returns an error if the next cursor cannot be encoded
pub fn paginate<T>(mut fetched: Vec<T>, request: &PageRequest) -> AppResult<CursorPage<T>> {
    let limit = request.limit as usize;
    let has_more = fetched.len() > limit;
    fetched.truncate(limit);

    let returned = u32::try_from(fetched.len()).unwrap_or(request.limit);
    let pagination = build_pagination_info(
        returned,
        request.limit,
        request.page,
        has_more,
        &request.filters,
    )?;

    Ok(CursorPage {
        items: fetched,
        pagination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_rejects_flipped_payload_byte() {
        let cursor = Cursor::encode(3, &CursorFilters::new()).unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(cursor.as_str()).unwrap();
        // {"filters":{},"page":3} -> page digit sits right before the closing brace
        let page_index = bytes.len() - CURSOR_DIGEST_LEN - 2;
        bytes[page_index] = b'4';
        let forged = URL_SAFE_NO_PAD.encode(bytes);

        let error = decode_cursor(&forged).unwrap_err();
        assert_eq!(error.kind(), "invalid_cursor");
    }

    #[test]
    fn test_offset_and_fetch_size() {
        let request = PageRequest {
            page: 3,
            limit: 10,
            filters: CursorFilters::new(),
        };
        assert_eq!(request.offset(), 20);
        assert_eq!(request.fetch_size(), 11);
    }

    #[test]
    fn test_window_clamps_to_list() {
        let items: Vec<u32> = (0..12).collect();
        let request = PageRequest {
            page: 2,
            limit: 10,
            filters: CursorFilters::new(),
        };
        assert_eq!(request.window(&items), &[10, 11]);

        let past_end = PageRequest {
            page: 5,
            limit: 10,
            filters: CursorFilters::new(),
        };
        assert!(past_end.window(&items).is_empty());
    }
}
