//! Environment keys and the fallback values substituted when they are absent.
//!
//! # Design
//! - Keep every key and default in one place so the loader and tests agree.
//! - Feature flags have no default constant: they are disabled unless set.

/// Environment key for the application display name.
pub const ENV_APP_NAME: &str = "VITE_APP_NAME";
/// Environment key for the public application URL.
pub const ENV_APP_URL: &str = "VITE_APP_URL";
/// Environment key for the deployment environment tag.
pub const ENV_APP_ENV: &str = "VITE_APP_ENV";
/// Environment key for the REST API base URL.
pub const ENV_API_URL: &str = "VITE_API_URL";
/// Environment key for the realtime socket base URL.
pub const ENV_SOCKET_URL: &str = "VITE_SOCKET_URL";
/// Environment key enabling short-let listings.
pub const ENV_FEATURE_SHORT_LET: &str = "VITE_FEATURE_SHORT_LET";
/// Environment key enabling the artisan marketplace.
pub const ENV_FEATURE_ARTISAN_MARKETPLACE: &str = "VITE_FEATURE_ARTISAN_MARKETPLACE";
/// Environment key enabling property management tools.
pub const ENV_FEATURE_PROPERTY_MANAGEMENT: &str = "VITE_FEATURE_PROPERTY_MANAGEMENT";
/// Build-mode flag set by the bundler for development builds.
pub const ENV_BUILD_DEV: &str = "DEV";
/// Build-mode flag set by the bundler for production builds.
pub const ENV_BUILD_PROD: &str = "PROD";

/// Application name used when `VITE_APP_NAME` is absent.
pub const DEFAULT_APP_NAME: &str = "Dwell";
/// Application URL used when `VITE_APP_URL` is absent.
pub const DEFAULT_APP_URL: &str = "http://localhost:5173";
/// API base URL used when `VITE_API_URL` is absent.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
/// Socket base URL used when `VITE_SOCKET_URL` is absent.
pub const DEFAULT_SOCKET_URL: &str = "http://localhost:5000";

/// The only value that switches a boolean input on.
pub const FLAG_ENABLED_VALUE: &str = "true";
