//! Argument parsing and command dispatch for the `dwell` binary.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use dwell_config::RuntimeConfig;
use dwell_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, parse_pair};
use crate::commands::config::handle_config_show;
use crate::commands::request::handle_request;

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    load_env_file(cli.env_file.as_deref());

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let command_name = command_label(&cli.command);
    debug!(command = command_name, trace_id = %trace_id, "running command");

    match dispatch(cli, trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: String) -> CliResult<()> {
    let base = RuntimeConfig::global().clone();
    let config = match cli.api_url {
        Some(api_url) => RuntimeConfig { api_url, ..base },
        None => base,
    };
    let ctx = AppContext::new(config, cli.token, cli.role, trace_id)?;

    match cli.command {
        Command::Request(args) => handle_request(&ctx, args).await,
        Command::Config(args) => handle_config_show(&ctx, args.format),
    }
}

fn load_env_file(path: Option<&Path>) {
    let outcome = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    if let (Err(err), Some(path)) = (outcome, path) {
        eprintln!("warning: failed to load {}: {err}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "dwell", about = "Command-line access to the Dwell marketplace API")]
pub(crate) struct Cli {
    /// Override the API base URL resolved from `VITE_API_URL`.
    #[arg(long, global = true)]
    pub(crate) api_url: Option<String>,
    /// Session token sent as a bearer credential.
    #[arg(long, global = true, env = "DWELL_SESSION_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    /// Active role sent in `X-Active-Role`.
    #[arg(long, global = true, env = "DWELL_ACTIVE_ROLE")]
    pub(crate) role: Option<String>,
    /// Dotenv file to load before resolving configuration.
    #[arg(long, global = true)]
    pub(crate) env_file: Option<PathBuf>,
    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    /// Log output format.
    #[arg(long, global = true, value_enum)]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Send one request through the gateway and print the response body.
    Request(RequestArgs),
    /// Print the resolved runtime configuration.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...).
    #[arg(value_parser = parse_method)]
    pub(crate) method: Method,
    /// Path relative to the API base URL, or an absolute URL.
    pub(crate) path: String,
    /// Query parameter as KEY=VALUE; repeatable.
    #[arg(long = "query", short = 'q', value_parser = parse_query)]
    pub(crate) query: Vec<(String, String)>,
    /// Extra header as NAME:VALUE; repeatable.
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub(crate) headers: Vec<(String, String)>,
    /// JSON request body.
    #[arg(long, short = 'd')]
    pub(crate) data: Option<String>,
    /// How to print the response body.
    #[arg(long, value_enum, default_value_t = BodyFormat::Pretty)]
    pub(crate) format: BodyFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ConfigArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum BodyFormat {
    /// Pretty-print JSON bodies, pass anything else through.
    #[default]
    Pretty,
    /// Print the body exactly as received.
    Raw,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

fn parse_method(input: &str) -> Result<Method, String> {
    Method::from_bytes(input.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{input}'"))
}

fn parse_query(input: &str) -> Result<(String, String), String> {
    parse_pair(input, '=')
}

fn parse_header(input: &str) -> Result<(String, String), String> {
    parse_pair(input, ':')
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Request(_) => "request",
        Command::Config(_) => "config",
    }
}

/// Parse a JSON body argument.
pub(crate) fn parse_body(raw: &str) -> CliResult<serde_json::Value> {
    serde_json::from_str(raw)
        .map_err(|err| CliError::validation(format!("request body is not valid JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::try_parse_from(args).map_err(|err| anyhow!(err.to_string()))
    }

    #[test]
    fn request_command_collects_repeatable_args() -> Result<()> {
        let cli = parse(&[
            "dwell",
            "--token",
            "abc123",
            "--role",
            "handyman",
            "request",
            "post",
            "/handyman/jobs",
            "-q",
            "draft=true",
            "-H",
            "x-client-version: cli",
            "--data",
            r#"{"title":"Fix sink"}"#,
        ])?;
        assert_eq!(cli.token.as_deref(), Some("abc123"));
        assert_eq!(cli.role.as_deref(), Some("handyman"));
        let Command::Request(args) = cli.command else {
            return Err(anyhow!("expected request command"));
        };
        assert_eq!(args.method, Method::POST);
        assert_eq!(args.path, "/handyman/jobs");
        assert_eq!(args.query, vec![("draft".to_string(), "true".to_string())]);
        assert_eq!(
            args.headers,
            vec![("x-client-version".to_string(), "cli".to_string())]
        );
        assert_eq!(args.format, BodyFormat::Pretty);
        Ok(())
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(parse(&["dwell", "request", "GET", "/x", "-q", "novalue"]).is_err());
        assert!(parse(&["dwell", "request", "GET", "/x", "-H", "novalue"]).is_err());
        assert!(parse(&["dwell", "request", "GE T", "/x"]).is_err());
    }

    #[test]
    fn config_command_defaults_to_table() -> Result<()> {
        let cli = parse(&["dwell", "config"])?;
        assert_eq!(command_label(&cli.command), "config");
        let Command::Config(args) = cli.command else {
            return Err(anyhow!("expected config command"));
        };
        assert_eq!(args.format, OutputFormat::Table);
        Ok(())
    }

    #[test]
    fn parse_body_requires_json() {
        assert!(parse_body(r#"{"ok":true}"#).is_ok());
        let err = parse_body("{oops").err();
        assert_eq!(err.map(|err| err.exit_code()), Some(2));
    }
}
