//! Typed runtime settings shared by every client component.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Deployment environment tag carried by `VITE_APP_ENV`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    /// Local development.
    #[default]
    Development,
    /// Pre-production staging.
    Staging,
    /// Production.
    Production,
}

impl FromStr for AppEnvironment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" | "stage" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("invalid app environment '{other}'")),
        }
    }
}

impl AppEnvironment {
    #[must_use]
    /// Render the environment as its lowercase string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transparent wrapper for boolean feature toggles to avoid pedantic lint churn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Toggle(pub bool);

impl Toggle {
    #[must_use]
    /// Whether the toggle is enabled.
    pub const fn is_enabled(self) -> bool {
        self.0
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<Toggle> for bool {
    fn from(value: Toggle) -> Self {
        value.0
    }
}

/// Named feature flags. Every flag is disabled unless explicitly enabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    /// Short-let (holiday) property listings.
    #[serde(rename = "FEATURE_SHORT_LET")]
    pub short_let: Toggle,
    /// Artisan marketplace listings and orders.
    #[serde(rename = "FEATURE_ARTISAN_MARKETPLACE")]
    pub artisan_marketplace: Toggle,
    /// Landlord property management tools.
    #[serde(rename = "FEATURE_PROPERTY_MANAGEMENT")]
    pub property_management: Toggle,
}

impl FeatureFlags {
    /// Names of the flags that are switched on, in declaration order.
    #[must_use]
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            ("FEATURE_SHORT_LET", self.short_let),
            ("FEATURE_ARTISAN_MARKETPLACE", self.artisan_marketplace),
            ("FEATURE_PROPERTY_MANAGEMENT", self.property_management),
        ]
        .into_iter()
        .filter(|(_, toggle)| toggle.is_enabled())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Immutable settings resolved once at process start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Display name of the application.
    pub app_name: String,
    /// Public URL the application is served from.
    pub app_url: String,
    /// Deployment environment tag.
    pub app_env: AppEnvironment,
    /// Base URL every API request is resolved against.
    pub api_url: String,
    /// Base URL for the realtime socket connection.
    pub socket_url: String,
    /// Feature toggles.
    pub features: FeatureFlags,
    /// Whether this is a development build.
    pub is_development: bool,
    /// Whether this is a production build.
    pub is_production: bool,
}
