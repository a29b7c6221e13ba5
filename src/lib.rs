//! XUI redirect gateway library.

// Core subsystems
pub mod config;
pub mod filter;
pub mod http;
pub mod routing;

// Operator surfaces
pub mod admin;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use filter::{XuiFilter, XuiFlag};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
