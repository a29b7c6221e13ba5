//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware.rs (XUI interception: redirect or continue)
//!     → server.rs forward_handler (rewrite URI, send upstream)
//!     → Send response to client
//! ```

pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
