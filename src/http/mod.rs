//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, connection addresses)
//!     → translate.rs (pick scope, run translate pipeline)
//!     → response.rs (JSON mapping or declined)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod translate;

pub use request::{ConnectionAddrs, MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
pub use translate::{Resolution, Runtime};
