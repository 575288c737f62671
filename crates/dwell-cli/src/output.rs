//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use dwell_config::RuntimeConfig;

use crate::cli::{BodyFormat, OutputFormat};
use crate::client::{CliError, CliResult};

pub(crate) fn render_body(text: &str, format: BodyFormat) {
    println!("{}", format_body(text, format));
}

pub(crate) fn format_body(text: &str, format: BodyFormat) -> String {
    match format {
        BodyFormat::Raw => text.to_string(),
        BodyFormat::Pretty => serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| text.to_string()),
    }
}

pub(crate) fn render_config(config: &RuntimeConfig, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(config)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            for (key, value) in config_rows(config) {
                println!("{key:<28} {value}");
            }
        }
    }
    Ok(())
}

pub(crate) fn config_rows(config: &RuntimeConfig) -> Vec<(&'static str, String)> {
    let features = &config.features;
    vec![
        ("APP_NAME", config.app_name.clone()),
        ("APP_URL", config.app_url.clone()),
        ("APP_ENV", config.app_env.to_string()),
        ("API_URL", config.api_url.clone()),
        ("SOCKET_URL", config.socket_url.clone()),
        (
            "FEATURE_SHORT_LET",
            features.short_let.is_enabled().to_string(),
        ),
        (
            "FEATURE_ARTISAN_MARKETPLACE",
            features.artisan_marketplace.is_enabled().to_string(),
        ),
        (
            "FEATURE_PROPERTY_MANAGEMENT",
            features.property_management.is_enabled().to_string(),
        ),
        ("IS_DEV", config.is_development.to_string()),
        ("IS_PROD", config.is_production.to_string()),
    ]
}
