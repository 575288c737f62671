//! Shared request gateway.
//!
//! # Design
//! - One `reqwest::Client` per gateway, rooted at the configured API base URL
//!   with a fixed per-request timeout.
//! - Identity is read from the injected provider once per dispatch, after the
//!   request is built and before any byte leaves the process.
//! - Outcomes pass through unchanged: no retry, no refresh, no rewriting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dwell_api_models::ApiResponse;
use dwell_config::RuntimeConfig;
use reqwest::{Client, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::identity::{Anonymous, IdentityProvider};
use crate::middleware::{ActiveRole, BearerToken, RequestStep, ResponseStep, TraceOutcome};
use crate::request::RequestDescriptor;

/// Timeout applied to every request regardless of method or payload.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Single outbound HTTP gateway shared by every feature module.
///
/// Cloning is cheap; clones share the connection pool, identity provider, and
/// step chain.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
    request_steps: Arc<[Arc<dyn RequestStep>]>,
    response_steps: Arc<[Arc<dyn ResponseStep>]>,
}

/// Builder for [`Gateway`].
pub struct GatewayBuilder {
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
    request_steps: Vec<Arc<dyn RequestStep>>,
    response_steps: Vec<Arc<dyn ResponseStep>>,
}

impl GatewayBuilder {
    /// Inject the identity provider read on every dispatch.
    #[must_use]
    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    /// Append a request step after the identity steps.
    #[must_use]
    pub fn request_step(mut self, step: impl RequestStep + 'static) -> Self {
        self.request_steps.push(Arc::new(step));
        self
    }

    /// Append a response step after outcome tracing.
    #[must_use]
    pub fn response_step(mut self, step: impl ResponseStep + 'static) -> Self {
        self.response_steps.push(Arc::new(step));
        self
    }

    /// Construct the gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn build(self) -> GatewayResult<Gateway> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Gateway {
            client,
            base_url: self.base_url,
            identity: self.identity,
            request_steps: self.request_steps.into(),
            response_steps: self.response_steps.into(),
        })
    }
}

impl Gateway {
    /// Start a builder rooted at `config.api_url` with the default step chain
    /// (bearer token, active role, outcome tracing) and no identity.
    #[must_use]
    pub fn builder(config: &RuntimeConfig) -> GatewayBuilder {
        GatewayBuilder {
            base_url: config.api_url.clone(),
            identity: Arc::new(Anonymous),
            request_steps: vec![Arc::new(BearerToken), Arc::new(ActiveRole)],
            response_steps: vec![Arc::new(TraceOutcome)],
        }
    }

    /// Gateway with the default step chain reading identity from `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(config: &RuntimeConfig, identity: Arc<dyn IdentityProvider>) -> GatewayResult<Self> {
        Self::builder(config).identity(identity).build()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL.
    ///
    /// Absolute `http(s)` URLs are used as-is; anything else is appended to
    /// the base with exactly one `/` between them.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] when the result does not parse.
    pub fn resolve_url(&self, path: &str) -> GatewayResult<Url> {
        let raw = if is_absolute(path) {
            path.to_string()
        } else if path.is_empty() {
            self.base_url.clone()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };
        Url::parse(&raw).map_err(|source| GatewayError::invalid_url(raw, source))
    }

    /// Build the exact request that [`Gateway::send`] would dispatch,
    /// including identity headers read now.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, body, or an identity header is invalid.
    pub fn prepare(&self, descriptor: RequestDescriptor) -> GatewayResult<Request> {
        let url = self.resolve_url(&descriptor.path)?;
        let mut builder = self
            .client
            .request(descriptor.method, url)
            .timeout(REQUEST_TIMEOUT)
            .headers(descriptor.headers);
        if !descriptor.query.is_empty() {
            builder = builder.query(&descriptor.query);
        }
        if let Some(body) = &descriptor.body {
            builder = builder.json(body);
        }
        let mut request = builder.build()?;

        let identity = self.identity.snapshot();
        for step in self.request_steps.iter() {
            step.apply(&mut request, &identity)?;
        }

        debug!(
            method = %request.method(),
            url = %request.url(),
            authenticated = identity.token().is_some(),
            role = ?identity.role(),
            "dispatching request"
        );
        Ok(request)
    }

    /// Dispatch `descriptor` and return the raw response.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as [`GatewayError::Transport`] with the
    /// original error; non-2xx answers as [`GatewayError::Status`] with the
    /// raw body.
    pub async fn send(&self, descriptor: RequestDescriptor) -> GatewayResult<Response> {
        let outcome = match self.prepare(descriptor) {
            Ok(request) => self.dispatch(request).await,
            Err(err) => Err(err),
        };
        match &outcome {
            Ok(response) => {
                for step in self.response_steps.iter() {
                    step.on_response(response);
                }
            }
            Err(err) => {
                for step in self.response_steps.iter() {
                    step.on_error(err);
                }
            }
        }
        outcome
    }

    /// Dispatch `descriptor` and decode the success envelope.
    ///
    /// # Errors
    ///
    /// Everything [`Gateway::send`] returns, plus [`GatewayError::Decode`] when
    /// the body is not an `ApiResponse<T>`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> GatewayResult<ApiResponse<T>> {
        let response = self.send(descriptor).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| GatewayError::Decode { status, source })
    }

    /// `GET path`, decoded.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send_json`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<ApiResponse<T>> {
        self.send_json(RequestDescriptor::get(path)).await
    }

    /// `POST path` with a JSON body, decoded.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send_json`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<ApiResponse<T>> {
        self.send_json(RequestDescriptor::post(path).json(body)?)
            .await
    }

    /// `PUT path` with a JSON body, decoded.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send_json`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<ApiResponse<T>> {
        self.send_json(RequestDescriptor::put(path).json(body)?)
            .await
    }

    /// `PATCH path` with a JSON body, decoded.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send_json`].
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<ApiResponse<T>> {
        self.send_json(RequestDescriptor::patch(path).json(body)?)
            .await
    }

    /// `DELETE path`, decoded.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send_json`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<ApiResponse<T>> {
        self.send_json(RequestDescriptor::delete(path)).await
    }

    async fn dispatch(&self, request: Request) -> GatewayResult<Response> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "failed to read error body");
                String::new()
            }
        };
        Err(GatewayError::Status {
            status,
            headers,
            body,
        })
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field(
                "request_steps",
                &self.request_steps.iter().map(|step| step.name()).collect::<Vec<_>>(),
            )
            .field(
                "response_steps",
                &self.response_steps.iter().map(|step| step.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn is_absolute(path: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        path.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
