//! Identity snapshot contract consumed by the gateway.
//!
//! # Design
//! - The gateway never caches identity; it asks an [`IdentityProvider`] for a
//!   fresh [`IdentitySnapshot`] on every dispatch.
//! - Providers are injected at construction so tests and callers can swap the
//!   session store without touching global state.

use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Point-in-time view of the caller's session token and active role.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentitySnapshot {
    /// Opaque bearer token, if signed in.
    pub session_token: Option<String>,
    /// Selected role for multi-role users (e.g. `handyman`).
    pub active_role: Option<String>,
}

impl IdentitySnapshot {
    /// Token to send, ignoring empty values.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session_token.as_deref().filter(|token| !token.is_empty())
    }

    /// Role to send, ignoring empty values.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.active_role.as_deref().filter(|role| !role.is_empty())
    }
}

impl fmt::Debug for IdentitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySnapshot")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("active_role", &self.active_role)
            .finish()
    }
}

/// Synchronous, non-blocking source of the current identity.
///
/// Implementations must return the value current at call time.
pub trait IdentityProvider: Send + Sync {
    /// Current session token, if any.
    fn session_token(&self) -> Option<String>;

    /// Current active role, if any.
    fn active_role(&self) -> Option<String>;

    /// Read both values.
    fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            session_token: self.session_token(),
            active_role: self.active_role(),
        }
    }
}

/// Provider that never has an identity; every request goes out unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn session_token(&self) -> Option<String> {
        None
    }

    fn active_role(&self) -> Option<String> {
        None
    }
}

/// Shared in-memory session store.
///
/// The token and role have independent lifecycles: signing out clears the
/// token while switching roles only touches the role.
#[derive(Default)]
pub struct IdentityStore {
    token: RwLock<Option<String>>,
    role: RwLock<Option<String>>,
}

impl IdentityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session token.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Drop the session token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Switch the active role.
    pub fn set_role(&self, role: impl Into<String>) {
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = Some(role.into());
    }

    /// Drop the active role.
    pub fn clear_role(&self) {
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for IdentityStore {
    fn session_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn active_role(&self) -> Option<String> {
        self.role
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Formatting must not block on writers, so the locks stay untouched.
        f.debug_struct("IdentityStore")
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Provider backed by a pair of read functions, for bridging external stores.
pub struct FnIdentity<T, R> {
    token: T,
    role: R,
}

impl<T, R> FnIdentity<T, R>
where
    T: Fn() -> Option<String> + Send + Sync,
    R: Fn() -> Option<String> + Send + Sync,
{
    /// Wrap the token and role readers.
    pub const fn new(token: T, role: R) -> Self {
        Self { token, role }
    }
}

impl<T, R> IdentityProvider for FnIdentity<T, R>
where
    T: Fn() -> Option<String> + Send + Sync,
    R: Fn() -> Option<String> + Send + Sync,
{
    fn session_token(&self) -> Option<String> {
        (self.token)()
    }

    fn active_role(&self) -> Option<String> {
        (self.role)()
    }
}
