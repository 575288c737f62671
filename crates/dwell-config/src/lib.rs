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

//! Runtime settings for the Dwell client, resolved once from environment input.
//!
//! Layout: `model.rs` (typed settings), `defaults.rs` (environment keys and
//! fallback values), `loader.rs` (`EnvSource` and resolution).

pub mod defaults;
pub mod loader;
pub mod model;

pub use loader::{EnvSource, ProcessEnv, resolve};
pub use model::{AppEnvironment, FeatureFlags, RuntimeConfig, Toggle};
