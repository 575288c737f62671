use anyhow::anyhow;
use dwell_client::RequestDescriptor;
use tracing::info;

use crate::cli::{RequestArgs, parse_body};
use crate::client::{AppContext, CliError, CliResult, HEADER_REQUEST_ID, classify_gateway_error};
use crate::output::render_body;

pub(crate) async fn handle_request(ctx: &AppContext, args: RequestArgs) -> CliResult<()> {
    let descriptor = build_descriptor(ctx, &args)?;
    let response = ctx
        .gateway
        .send(descriptor)
        .await
        .map_err(classify_gateway_error)?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read response body: {err}")))?;
    info!(status = status.as_u16(), bytes = text.len(), "request completed");
    render_body(&text, args.format);
    Ok(())
}

fn build_descriptor(ctx: &AppContext, args: &RequestArgs) -> CliResult<RequestDescriptor> {
    let mut descriptor = RequestDescriptor::new(args.method.clone(), args.path.clone())
        .try_header(HEADER_REQUEST_ID, &ctx.trace_id)
        .map_err(classify_gateway_error)?;
    for (key, value) in &args.query {
        descriptor = descriptor.query(key.clone(), value);
    }
    for (name, value) in &args.headers {
        descriptor = descriptor
            .try_header(name, value)
            .map_err(classify_gateway_error)?;
    }
    if let Some(raw) = args.data.as_deref() {
        descriptor = descriptor.body(parse_body(raw)?);
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BodyFormat;
    use anyhow::Result;
    use dwell_config::resolve;
    use httpmock::prelude::*;
    use reqwest::Method;
    use serde_json::json;
    use std::collections::HashMap;

    fn context(base: &str, token: Option<&str>, role: Option<&str>) -> Result<AppContext> {
        let api_url = format!("{base}/api");
        let env = HashMap::from([("VITE_API_URL", api_url.as_str())]);
        AppContext::new(
            resolve(&env),
            token.map(str::to_string),
            role.map(str::to_string),
            "trace-42".to_string(),
        )
        .map_err(|err| anyhow!(err.display_message()))
    }

    fn args(method: Method, path: &str) -> RequestArgs {
        RequestArgs {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            data: None,
            format: BodyFormat::Raw,
        }
    }

    #[tokio::test]
    async fn request_carries_identity_and_trace_headers() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/handyman/jobs")
                    .query_param("draft", "true")
                    .header("authorization", "Bearer abc123")
                    .header("x-active-role", "handyman")
                    .header("x-request-id", "trace-42")
                    .header("x-client-version", "cli")
                    .json_body(json!({"title": "Fix sink"}));
                then.status(201).json_body(json!({"success": true}));
            })
            .await;

        let ctx = context(&server.base_url(), Some("abc123"), Some("handyman"))?;
        let mut request = args(Method::POST, "/handyman/jobs");
        request.query = vec![("draft".to_string(), "true".to_string())];
        request.headers = vec![("x-client-version".to_string(), "cli".to_string())];
        request.data = Some(r#"{"title":"Fix sink"}"#.to_string());

        handle_request(&ctx, request)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_request_omits_identity_headers() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/properties")
                    .header_missing("authorization")
                    .header_missing("x-active-role");
                then.status(200).body("[]");
            })
            .await;

        let ctx = context(&server.base_url(), None, None)?;
        handle_request(&ctx, args(Method::GET, "/properties"))
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn unprocessable_response_is_a_validation_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/properties");
                then.status(422).json_body(json!({
                    "success": false,
                    "error": {"code": "VALIDATION_ERROR", "message": "price must be positive"},
                    "timestamp": "2026-04-02T12:00:00Z"
                }));
            })
            .await;

        let ctx = context(&server.base_url(), Some("abc123"), None)?;
        let mut request = args(Method::POST, "/properties");
        request.data = Some(r#"{"price":-1}"#.to_string());
        let Err(err) = handle_request(&ctx, request).await else {
            return Err(anyhow!("expected 422 to fail"));
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("price must be positive"));
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_response_is_a_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/auth/me");
                then.status(401).body("token expired");
            })
            .await;

        let ctx = context(&server.base_url(), Some("stale"), None)?;
        let Err(err) = handle_request(&ctx, args(Method::GET, "/auth/me")).await else {
            return Err(anyhow!("expected 401 to fail"));
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("token expired"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_before_dispatch() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let ctx = context(&server.base_url(), None, None)?;
        let mut request = args(Method::POST, "/properties");
        request.data = Some("{oops".to_string());
        let Err(err) = handle_request(&ctx, request).await else {
            return Err(anyhow!("expected invalid body to fail"));
        };
        assert_eq!(err.exit_code(), 2);
        mock.assert_calls_async(0).await;
        Ok(())
    }
}
