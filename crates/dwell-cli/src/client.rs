//! Shared gateway context and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use dwell_api_models::ApiErrorEnvelope;
use dwell_client::{Gateway, GatewayError, IdentityProvider, IdentityStore};
use dwell_config::RuntimeConfig;
use reqwest::StatusCode;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Gateway plus the per-invocation trace identifier.
pub(crate) struct AppContext {
    pub(crate) gateway: Gateway,
    pub(crate) config: RuntimeConfig,
    pub(crate) trace_id: String,
}

impl AppContext {
    /// Build a gateway for `config` carrying the optional token and role.
    pub(crate) fn new(
        config: RuntimeConfig,
        token: Option<String>,
        role: Option<String>,
        trace_id: String,
    ) -> CliResult<Self> {
        let store = IdentityStore::new();
        if let Some(token) = token {
            store.set_token(token);
        }
        if let Some(role) = role {
            store.set_role(role);
        }
        let identity: Arc<dyn IdentityProvider> = Arc::new(store);
        let gateway = Gateway::new(&config, identity)
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            gateway,
            config,
            trace_id,
        })
    }
}

/// Parse a `key<sep>value` pair supplied on the command line.
pub(crate) fn parse_pair(input: &str, separator: char) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once(separator)
        .ok_or_else(|| format!("expected KEY{separator}VALUE, got '{input}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{input}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Map a gateway rejection onto the CLI exit-code scheme.
pub(crate) fn classify_gateway_error(error: GatewayError) -> CliError {
    if let GatewayError::Status { status, body, .. } = &error {
        return classify_status(*status, body, error.error_envelope());
    }
    if matches!(
        error,
        GatewayError::InvalidUrl { .. }
            | GatewayError::InvalidHeaderName { .. }
            | GatewayError::InvalidHeaderValue { .. }
            | GatewayError::Encode { .. }
    ) {
        let source = source_text(&error);
        return if source.is_empty() {
            CliError::validation(error.to_string())
        } else {
            CliError::validation(format!("{error}: {source}"))
        };
    }
    CliError::failure(error)
}

fn classify_status(status: StatusCode, body: &str, envelope: Option<ApiErrorEnvelope>) -> CliError {
    let message = envelope.map_or_else(
        || body.trim().to_string(),
        |envelope| format!("{} ({})", envelope.error.message, envelope.error.code),
    );
    let detail = if message.is_empty() {
        format!("request failed with status {status}")
    } else {
        format!("{message} (status {status})")
    };
    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        CliError::validation(detail)
    } else {
        CliError::failure(anyhow!(detail))
    }
}

fn source_text(error: &GatewayError) -> String {
    std::error::Error::source(error).map_or_else(String::new, ToString::to_string)
}
