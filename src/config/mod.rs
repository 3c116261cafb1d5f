//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, directive compilation)
//!     → scope.rs (apply scope inheritance once)
//!     → RuntimeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On reload:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<RuntimeConfig>
//!     → requests in flight keep the snapshot they started with
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Template syntax errors fail the load, never a request

pub mod directive;
pub mod loader;
pub mod schema;
pub mod scope;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError, RuntimeConfig};
pub use schema::{AliasConfig, ListenerConfig, ScopeConfig, ServiceConfig, UserDirConfig};
pub use scope::{ResolvedScope, ScopeTable};
