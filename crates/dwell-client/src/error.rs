//! # Design
//!
//! - Transport failures are forwarded as the raw `reqwest::Error`; the gateway
//!   never classifies or rewrites them.
//! - Everything else carries constant messages plus the context needed to
//!   reproduce the failure.

use dwell_api_models::ApiErrorEnvelope;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, InvalidHeaderValue};
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the request gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request path could not be combined with the base URL.
    #[error("invalid request URL")]
    InvalidUrl {
        /// URL that failed to parse.
        url: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// A header name was not a valid HTTP token.
    #[error("invalid header name")]
    InvalidHeaderName {
        /// Offending header name.
        name: String,
    },
    /// A header value could not be encoded.
    #[error("invalid header value")]
    InvalidHeaderValue {
        /// Header the value was meant for.
        name: String,
        /// Underlying encoding error.
        source: InvalidHeaderValue,
    },
    /// A request body could not be serialised.
    #[error("request body encoding failed")]
    Encode {
        /// Underlying serialisation error.
        source: serde_json::Error,
    },
    /// The transport failed (connect, timeout, protocol, body read).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response headers as received (`Retry-After`, `WWW-Authenticate`, ...).
        headers: HeaderMap,
        /// Raw response body; empty when the body could not be read.
        body: String,
    },
    /// A success body did not match the expected envelope.
    #[error("response body decoding failed")]
    Decode {
        /// Status of the response that failed to decode.
        status: StatusCode,
        /// Underlying deserialisation error.
        source: serde_json::Error,
    },
}

impl GatewayError {
    pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn invalid_header_value(
        name: impl Into<String>,
        source: InvalidHeaderValue,
    ) -> Self {
        Self::InvalidHeaderValue {
            name: name.into(),
            source,
        }
    }

    /// Status code of a rejected response, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Headers of a rejected response.
    #[must_use]
    pub const fn response_headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Status { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// Parse the standard error envelope out of a non-success response body.
    ///
    /// Returns `None` for other variants or when the body is not an envelope.
    #[must_use]
    pub fn error_envelope(&self) -> Option<ApiErrorEnvelope> {
        match self {
            Self::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Whether the request never reached a server response (connect or timeout).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
