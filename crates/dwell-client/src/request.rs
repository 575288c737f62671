//! Caller-facing description of a single API call.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// Method, path, and optional parts of a request routed through the gateway.
///
/// `path` is resolved against the gateway base URL unless it is already an
/// absolute `http(s)` URL.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) headers: HeaderMap,
}

impl RequestDescriptor {
    /// Describe a request with no query, body, or extra headers.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH path`.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialise `body` and attach it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] if `body` cannot be serialised.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> GatewayResult<Self> {
        let value = serde_json::to_value(body).map_err(|source| GatewayError::Encode { source })?;
        Ok(self.body(value))
    }

    /// Set a typed header, replacing any previous value for `name`.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Parse and set a header from raw strings.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is not a valid header token or `value`
    /// contains bytes that cannot appear in a header.
    pub fn try_header(self, name: &str, value: &str) -> GatewayResult<Self> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| GatewayError::InvalidHeaderName {
                name: name.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|err| GatewayError::invalid_header_value(name, err))?;
        Ok(self.header(header_name, header_value))
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path as supplied by the caller.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Headers supplied by the caller.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[derive(Serialize)]
    struct JobQuote {
        job_id: &'static str,
        amount_kobo: u64,
    }

    #[test]
    fn builder_collects_parts() -> Result<()> {
        let descriptor = RequestDescriptor::post("/handyman/quotes")
            .query("draft", true)
            .json(&JobQuote {
                job_id: "job-9",
                amount_kobo: 1_250_000,
            })?
            .try_header("x-client-version", "web-2.4.0")?;

        assert_eq!(descriptor.method(), &Method::POST);
        assert_eq!(descriptor.path(), "/handyman/quotes");
        assert_eq!(descriptor.query, vec![("draft".to_string(), "true".to_string())]);
        assert_eq!(
            descriptor.body,
            Some(json!({"job_id": "job-9", "amount_kobo": 1_250_000}))
        );
        assert_eq!(
            descriptor
                .headers()
                .get("x-client-version")
                .and_then(|value| value.to_str().ok()),
            Some("web-2.4.0")
        );
        Ok(())
    }

    #[test]
    fn try_header_rejects_bad_input() {
        let err = RequestDescriptor::get("/").try_header("bad header", "v").err();
        assert!(matches!(err, Some(GatewayError::InvalidHeaderName { .. })));

        let err = RequestDescriptor::get("/").try_header("x-ok", "a\r\nb").err();
        assert!(matches!(err, Some(GatewayError::InvalidHeaderValue { .. })));
    }
}
