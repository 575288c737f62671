//! Environment-driven resolution of [`RuntimeConfig`].
//!
//! # Design
//! - Resolution never fails: absent, blank, or malformed input falls back to
//!   the defaults in `defaults.rs`.
//! - Boolean inputs are fail-closed; only the exact value `true` enables one.
//! - The process-wide instance is resolved once and never re-read.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use tracing::warn;
use url::Url;

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_APP_NAME, DEFAULT_APP_URL, DEFAULT_SOCKET_URL, ENV_API_URL,
    ENV_APP_ENV, ENV_APP_NAME, ENV_APP_URL, ENV_BUILD_DEV, ENV_BUILD_PROD,
    ENV_FEATURE_ARTISAN_MARKETPLACE, ENV_FEATURE_PROPERTY_MANAGEMENT, ENV_FEATURE_SHORT_LET,
    ENV_SOCKET_URL, FLAG_ENABLED_VALUE,
};
use crate::model::{AppEnvironment, FeatureFlags, RuntimeConfig, Toggle};

static GLOBAL: OnceCell<RuntimeConfig> = OnceCell::new();

/// Read-only source of string-keyed environment input.
pub trait EnvSource {
    /// Return the raw value for `key`, or `None` when it is not set.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| (*value).to_string())
    }
}

/// Resolve settings from `env`, substituting defaults for anything absent.
#[must_use]
pub fn resolve<E: EnvSource + ?Sized>(env: &E) -> RuntimeConfig {
    let app_env = non_blank(env, ENV_APP_ENV).map_or_else(AppEnvironment::default, |raw| {
        raw.parse().unwrap_or_else(|err| {
            warn!(error = %err, "unknown app environment; using default");
            AppEnvironment::default()
        })
    });

    let is_development = non_blank(env, ENV_BUILD_DEV).map_or(
        app_env == AppEnvironment::Development,
        |raw| is_enabled(&raw),
    );
    let is_production = non_blank(env, ENV_BUILD_PROD).map_or(
        app_env == AppEnvironment::Production,
        |raw| is_enabled(&raw),
    );

    RuntimeConfig {
        app_name: string_or(env, ENV_APP_NAME, DEFAULT_APP_NAME),
        app_url: url_or(env, ENV_APP_URL, DEFAULT_APP_URL),
        app_env,
        api_url: url_or(env, ENV_API_URL, DEFAULT_API_URL),
        socket_url: url_or(env, ENV_SOCKET_URL, DEFAULT_SOCKET_URL),
        features: FeatureFlags {
            short_let: flag(env, ENV_FEATURE_SHORT_LET),
            artisan_marketplace: flag(env, ENV_FEATURE_ARTISAN_MARKETPLACE),
            property_management: flag(env, ENV_FEATURE_PROPERTY_MANAGEMENT),
        },
        is_development,
        is_production,
    }
}

impl RuntimeConfig {
    /// Process-wide settings, resolved from [`ProcessEnv`] on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| resolve(&ProcessEnv))
    }
}

fn non_blank<E: EnvSource + ?Sized>(env: &E, key: &str) -> Option<String> {
    env.var(key).filter(|value| !value.trim().is_empty())
}

fn string_or<E: EnvSource + ?Sized>(env: &E, key: &str, default: &str) -> String {
    non_blank(env, key).unwrap_or_else(|| default.to_string())
}

fn url_or<E: EnvSource + ?Sized>(env: &E, key: &str, default: &str) -> String {
    let Some(raw) = non_blank(env, key) else {
        return default.to_string();
    };
    match Url::parse(raw.trim()) {
        Ok(_) => raw.trim().to_string(),
        Err(err) => {
            warn!(key, error = %err, "malformed URL; using default");
            default.to_string()
        }
    }
}

fn flag<E: EnvSource + ?Sized>(env: &E, key: &str) -> Toggle {
    Toggle(env.var(key).is_some_and(|raw| is_enabled(&raw)))
}

fn is_enabled(raw: &str) -> bool {
    raw == FLAG_ENABLED_VALUE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = resolve(&env_of(&[]));
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert_eq!(config.app_env, AppEnvironment::Development);
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.socket_url, DEFAULT_SOCKET_URL);
        assert_eq!(config.features, FeatureFlags::default());
        assert!(!config.features.short_let.is_enabled());
        assert!(!config.features.artisan_marketplace.is_enabled());
        assert!(!config.features.property_management.is_enabled());
        assert!(config.is_development);
        assert!(!config.is_production);
    }

    #[test]
    fn single_flag_enables_only_itself() {
        let config = resolve(&env_of(&[(ENV_FEATURE_SHORT_LET, "true")]));
        assert!(config.features.short_let.is_enabled());
        assert!(!config.features.artisan_marketplace.is_enabled());
        assert!(!config.features.property_management.is_enabled());
    }

    #[test]
    fn flags_require_exact_true() {
        for raw in ["TRUE", "1", "yes", " true", ""] {
            let config = resolve(&env_of(&[(ENV_FEATURE_ARTISAN_MARKETPLACE, raw)]));
            assert!(
                !config.features.artisan_marketplace.is_enabled(),
                "{raw:?} must not enable the flag"
            );
        }
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = resolve(&env_of(&[
            (ENV_APP_NAME, "Dwell Staging"),
            (ENV_APP_URL, "https://staging.dwell.example"),
            (ENV_APP_ENV, "staging"),
            (ENV_API_URL, "https://api.staging.dwell.example/v1"),
            (ENV_SOCKET_URL, "wss://rt.staging.dwell.example"),
            (ENV_FEATURE_PROPERTY_MANAGEMENT, "true"),
        ]));
        assert_eq!(config.app_name, "Dwell Staging");
        assert_eq!(config.app_url, "https://staging.dwell.example");
        assert_eq!(config.app_env, AppEnvironment::Staging);
        assert_eq!(config.api_url, "https://api.staging.dwell.example/v1");
        assert_eq!(config.socket_url, "wss://rt.staging.dwell.example");
        assert!(config.features.property_management.is_enabled());
        assert!(!config.is_development);
        assert!(!config.is_production);
    }

    #[test]
    fn malformed_input_degrades_to_defaults() {
        let config = resolve(&env_of(&[(ENV_APP_ENV, "qa"), (ENV_API_URL, "   ")]));
        assert_eq!(config.app_env, AppEnvironment::Development);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn unparsable_urls_degrade_to_defaults() {
        let config = resolve(&env_of(&[
            (ENV_API_URL, "not a url"),
            (ENV_SOCKET_URL, "http://exa mple.com"),
            (ENV_APP_URL, "//missing-scheme"),
        ]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.socket_url, DEFAULT_SOCKET_URL);
        assert_eq!(config.app_url, DEFAULT_APP_URL);

        let trimmed = resolve(&env_of(&[(ENV_API_URL, " https://api.dwell.example ")]));
        assert_eq!(trimmed.api_url, "https://api.dwell.example");
    }

    #[test]
    fn build_mode_flags_take_precedence_over_environment_tag() {
        let config = resolve(&env_of(&[
            (ENV_APP_ENV, "production"),
            (ENV_BUILD_DEV, "true"),
            (ENV_BUILD_PROD, "false"),
        ]));
        assert_eq!(config.app_env, AppEnvironment::Production);
        assert!(config.is_development);
        assert!(!config.is_production);

        let derived = resolve(&env_of(&[(ENV_APP_ENV, "production")]));
        assert!(derived.is_production);
        assert!(!derived.is_development);
    }

    #[test]
    fn owned_map_source_matches_borrowed_map() {
        let owned: HashMap<String, String> =
            HashMap::from([(ENV_API_URL.to_string(), "http://10.0.0.2/api".to_string())]);
        let borrowed = env_of(&[(ENV_API_URL, "http://10.0.0.2/api")]);
        assert_eq!(resolve(&owned), resolve(&borrowed));
    }

    #[test]
    fn global_is_resolved_once() {
        let first = RuntimeConfig::global();
        let second = RuntimeConfig::global();
        assert!(std::ptr::eq(first, second));
    }
}
