#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP envelopes for the Dwell marketplace API.
//!
//! Every endpoint wraps its payload in an [`ApiResponse`] on success and an
//! [`ApiErrorEnvelope`] on failure. These are structural contracts only: the
//! request gateway never checks them, callers decode what they expect.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success envelope wrapping an endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always `true` for a success envelope.
    pub success: bool,
    /// Endpoint payload.
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional human-readable message.
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Paging metadata for list endpoints.
    pub pagination: Option<PaginationMeta>,
    /// Server time the envelope was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` in a success envelope stamped with the current time.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach paging metadata.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Failure envelope returned alongside non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorEnvelope {
    /// Always `false` for an error envelope.
    pub success: bool,
    /// Error detail.
    pub error: ApiErrorBody,
    /// Server time the envelope was produced.
    pub timestamp: DateTime<Utc>,
}

/// Machine-readable error detail carried by [`ApiErrorEnvelope`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    /// Stable error code (e.g. `UNAUTHORIZED`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Free-form diagnostic payload.
    pub details: Option<Value>,
}

/// Page position within a list response.
///
/// Server-produced values are expected to satisfy `has_next == page * limit < total`
/// and `has_previous == page > 1`; decoding does not enforce this, see
/// [`PaginationMeta::is_consistent`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total item count across all pages.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

impl PaginationMeta {
    /// Build metadata for `page` of size `limit` over `total` items.
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: Self::expected_has_next(page, limit, total),
            has_previous: page > 1,
        }
    }

    /// Whether the navigation flags agree with `page`, `limit`, and `total`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.has_next == Self::expected_has_next(self.page, self.limit, self.total)
            && self.has_previous == (self.page > 1)
    }

    fn expected_has_next(page: u32, limit: u32, total: u64) -> bool {
        u64::from(page) * u64::from(limit) < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn pagination_derives_navigation_flags() {
        let first = PaginationMeta::new(1, 20, 45);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = PaginationMeta::new(3, 20, 45);
        assert!(!last.has_next);
        assert!(last.has_previous);

        let exact = PaginationMeta::new(2, 20, 40);
        assert_eq!(exact.total_pages, 2);
        assert!(!exact.has_next);

        let empty = PaginationMeta::new(1, 0, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn inconsistent_server_pagination_is_detected() {
        let mut meta = PaginationMeta::new(2, 10, 15);
        assert!(meta.is_consistent());
        meta.has_next = true;
        assert!(!meta.is_consistent());
    }

    #[test]
    fn success_envelope_decodes_camel_case() -> Result<()> {
        let raw = json!({
            "success": true,
            "data": [{"id": "p-1"}],
            "pagination": {
                "page": 1,
                "limit": 10,
                "total": 11,
                "totalPages": 2,
                "hasNext": true,
                "hasPrevious": false
            },
            "timestamp": "2026-01-05T10:00:00Z"
        });
        let envelope: ApiResponse<Vec<Value>> = serde_json::from_value(raw)?;
        assert!(envelope.success);
        assert_eq!(envelope.data.len(), 1);
        assert!(envelope.message.is_none());
        let pagination = envelope.pagination.ok_or_else(|| anyhow::anyhow!("pagination"))?;
        assert_eq!(pagination, PaginationMeta::new(1, 10, 11));
        Ok(())
    }

    #[test]
    fn error_envelope_keeps_details() -> Result<()> {
        let raw = json!({
            "success": false,
            "error": {
                "code": "FORBIDDEN",
                "message": "role not permitted",
                "details": {"role": "artisan"}
            },
            "timestamp": "2026-01-05T10:00:00Z"
        });
        let envelope: ApiErrorEnvelope = serde_json::from_value(raw)?;
        assert!(!envelope.success);
        assert_eq!(envelope.error.code, "FORBIDDEN");
        assert_eq!(envelope.error.details, Some(json!({"role": "artisan"})));
        Ok(())
    }

    #[test]
    fn ok_envelope_omits_empty_optionals() -> Result<()> {
        let value = serde_json::to_value(ApiResponse::ok(json!({"id": 7})))?;
        assert!(value.get("message").is_none());
        assert!(value.get("pagination").is_none());
        assert_eq!(value["success"], json!(true));
        Ok(())
    }
}
