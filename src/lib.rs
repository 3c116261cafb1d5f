//! Virtual document roots with fallback.
//!
//! Resolves a request's server name (or local IP) into a document root with
//! a `%`-selector template, and falls back to a fixed root when the computed
//! directory does not exist.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod vhost;

pub use config::RuntimeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use vhost::{compile, interpolate, resolve, LabelIndex, VhostAlias};
