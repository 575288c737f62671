//! Named steps applied around every dispatch.
//!
//! # Design
//! - [`RequestStep`]s run in order, synchronously, on the fully built request
//!   before it is handed to the transport.
//! - [`ResponseStep`]s observe the outcome by reference and cannot change it.
//! - Each identity step owns exactly one header and leaves every other header
//!   alone.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response};
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::identity::IdentitySnapshot;

/// Header carrying the caller's selected role.
pub const HEADER_ACTIVE_ROLE: &str = "x-active-role";

/// Pre-send transform applied to each outbound request.
pub trait RequestStep: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Mutate `request` using the identity captured for this dispatch.
    ///
    /// # Errors
    ///
    /// Returns an error when the request must not be sent.
    fn apply(&self, request: &mut Request, identity: &IdentitySnapshot) -> GatewayResult<()>;
}

/// Post-receive observer for each dispatch outcome.
pub trait ResponseStep: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Called with every successful response.
    fn on_response(&self, _response: &Response) {}

    /// Called with every rejected outcome.
    fn on_error(&self, _error: &GatewayError) {}
}

/// Sets `Authorization: Bearer <token>` when a session token is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerToken;

impl RequestStep for BearerToken {
    fn name(&self) -> &'static str {
        "bearer_token"
    }

    fn apply(&self, request: &mut Request, identity: &IdentitySnapshot) -> GatewayResult<()> {
        let Some(token) = identity.token() else {
            return Ok(());
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| GatewayError::invalid_header_value(AUTHORIZATION.as_str(), err))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Sets `X-Active-Role: <role>` when a non-empty role is selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveRole;

impl RequestStep for ActiveRole {
    fn name(&self) -> &'static str {
        "active_role"
    }

    fn apply(&self, request: &mut Request, identity: &IdentitySnapshot) -> GatewayResult<()> {
        let Some(role) = identity.role() else {
            return Ok(());
        };
        let value = HeaderValue::from_str(role)
            .map_err(|err| GatewayError::invalid_header_value(HEADER_ACTIVE_ROLE, err))?;
        request.headers_mut().insert(HEADER_ACTIVE_ROLE, value);
        Ok(())
    }
}

/// Logs each outcome without altering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceOutcome;

impl ResponseStep for TraceOutcome {
    fn name(&self) -> &'static str {
        "trace_outcome"
    }

    fn on_response(&self, response: &Response) {
        debug!(
            status = %response.status(),
            url = %response.url(),
            "request completed"
        );
    }

    fn on_error(&self, error: &GatewayError) {
        warn!(
            error = %error,
            status = ?error.status(),
            "request rejected"
        );
    }
}
