//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → scope.rs (context path + prefix match)
//!     → in scope: hand to the redirect filter
//!     → out of scope: forward upstream untouched
//!
//! Scope compilation (at startup):
//!     upstream.context_path + xui.intercept_prefixes
//!     → Freeze as immutable InterceptScope
//! ```
//!
//! # Design Decisions
//! - Scope compiled at startup, immutable at runtime
//! - Prefix matching only, no regex in the hot path
//! - Deterministic: same path always resolves the same way

pub mod scope;

pub use scope::InterceptScope;
