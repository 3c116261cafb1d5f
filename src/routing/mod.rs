//! Name translation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (uri, server name, local IP, port)
//!     → request.rs (RequestRec: inputs + output sink)
//!     → pipeline.rs (stages in fixed order)
//!         alias → userdir → vhost_alias_fallback → document_root
//!     → Return: handling stage name, or None
//!
//! Pipeline Construction (at load/reload):
//!     ResolvedScope
//!     → one Pipeline per scope
//!     → Freeze alongside the RuntimeConfig snapshot
//! ```
//!
//! # Design Decisions
//! - Pipelines compiled at load, immutable at runtime
//! - Deterministic: same input always takes the same stage
//! - First stage to handle wins

pub mod pipeline;
pub mod request;
pub mod stages;

pub use pipeline::{Pipeline, STAGE_ORDER};
pub use request::RequestRec;
pub use stages::{Outcome, TranslateStage};
