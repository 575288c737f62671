//! Login redirect boundary.
//!
//! Opening the auth dialog is a routing side effect: navigate to the login
//! route, remembering where the user was so the login view can render as an
//! overlay on top of it, then report the dialog closed. No network activity.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Route the login overlay is mounted at.
pub const LOGIN_PATH: &str = "/login";

/// Router location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path component, e.g. `/properties/p-4`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    #[serde(default)]
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    #[serde(default)]
    pub hash: String,
}

impl Location {
    /// Location with only a path.
    #[must_use]
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    /// Path, query, and fragment joined back together.
    #[must_use]
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// State carried alongside a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// View the destination renders over.
    pub background: Location,
}

/// Application router.
pub trait Navigator {
    /// Navigate to `to`, attaching `state`.
    fn navigate(&self, to: &str, state: NavigationState);
}

/// Stateless unit that sends the user to the login overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthRedirect;

impl AuthRedirect {
    /// Navigate to [`LOGIN_PATH`] over `current`, then call `on_close`.
    pub fn open<N, F>(&self, navigator: &N, current: &Location, on_close: F)
    where
        N: Navigator + ?Sized,
        F: FnOnce(),
    {
        debug!(from = %current.href(), "redirecting to login");
        navigator.navigate(
            LOGIN_PATH,
            NavigationState {
                background: current.clone(),
            },
        );
        on_close();
    }
}
