#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Authenticated request gateway for the Dwell marketplace API.
//!
//! Every feature module sends its HTTP traffic through a single [`Gateway`].
//! Before dispatch the gateway reads the current identity (session token and
//! active role) and stamps it onto the request; afterwards it hands the
//! outcome back to the caller untouched, failures included.
//!
//! Layout:
//! - `identity.rs`: identity snapshot contract and in-memory providers
//! - `middleware.rs`: named request/response steps applied around dispatch
//! - `request.rs`: caller-facing request descriptor
//! - `gateway.rs`: shared client, builder, and dispatch
//! - `error.rs`: gateway error type
//! - `redirect.rs`: login redirect boundary

pub mod error;
pub mod gateway;
pub mod identity;
pub mod middleware;
pub mod redirect;
pub mod request;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{Gateway, GatewayBuilder, REQUEST_TIMEOUT};
pub use identity::{Anonymous, FnIdentity, IdentityProvider, IdentitySnapshot, IdentityStore};
pub use middleware::{
    ActiveRole, BearerToken, HEADER_ACTIVE_ROLE, RequestStep, ResponseStep, TraceOutcome,
};
pub use redirect::{AuthRedirect, LOGIN_PATH, Location, NavigationState, Navigator};
pub use request::RequestDescriptor;
