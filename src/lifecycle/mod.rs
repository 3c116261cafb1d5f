//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Resolve scopes → Start watcher → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (including a bad template) is fatal
//! - A failed reload is logged and the running configuration kept

pub mod shutdown;

pub use shutdown::Shutdown;
