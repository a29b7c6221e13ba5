//! XUI redirect filter subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, raw query)
//!     → gate (XuiState predicate, non-empty path)
//!     → classifier.rs (logout | profile | login)
//!     → rewriter.rs (query suffix, advice re-encoding)
//!     → Decision::Redirect { location } or Decision::PassThrough
//! ```
//!
//! # Design Decisions
//! - Targets are compiled once at initialization, immutable at runtime
//! - The filter is pure over a RequestView: no I/O, no shared mutable
//!   state, safe for concurrent use across requests
//! - The enabled predicate is consulted exactly once per request

pub mod classifier;
pub mod encoder;
pub mod rewriter;
pub mod targets;
pub mod view;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use classifier::{classify, RedirectRoute};
pub use encoder::{EncodeError, QueryEncoder, StrictQueryEncoder};
pub use targets::RedirectTargets;
pub use view::{ParamMap, RequestView};

use encoder::StrictQueryEncoder as DefaultEncoder;
use rewriter::query_suffix;

/// Predicate reporting whether XUI redirection is currently enabled.
///
/// Consulted once per request; implementations must be cheap and
/// thread-safe. Plain closures qualify via the blanket impl.
pub trait XuiState: Send + Sync {
    fn xui_enabled(&self) -> bool;
}

impl<F> XuiState for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn xui_enabled(&self) -> bool {
        self()
    }
}

/// Shared, atomically updatable redirect flag.
///
/// Clones share the same underlying value: the admin API and the config
/// watcher write it while request handling reads it.
#[derive(Debug, Clone)]
pub struct XuiFlag {
    enabled: Arc<AtomicBool>,
}

impl XuiFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

impl XuiState for XuiFlag {
    fn xui_enabled(&self) -> bool {
        self.enabled()
    }
}

/// Outcome of evaluating one request against the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the downstream continuation unchanged.
    PassThrough,
    /// Answer with a 302 to `location`; the continuation must not run.
    Redirect {
        location: String,
        route: RedirectRoute,
    },
}

/// The redirect filter: precompiled targets, the enabled predicate, and
/// the query encoder.
pub struct XuiFilter {
    targets: RedirectTargets,
    state: Arc<dyn XuiState>,
    encoder: Arc<dyn QueryEncoder>,
}

impl XuiFilter {
    /// Create a filter over the given context base path with the strict
    /// production encoder.
    pub fn new(context_path: &str, state: Arc<dyn XuiState>) -> Self {
        Self::with_encoder(context_path, state, Arc::new(DefaultEncoder))
    }

    /// Create a filter with a custom query encoder.
    pub fn with_encoder(
        context_path: &str,
        state: Arc<dyn XuiState>,
        encoder: Arc<dyn QueryEncoder>,
    ) -> Self {
        Self {
            targets: RedirectTargets::new(context_path),
            state,
            encoder,
        }
    }

    /// Evaluate one request. Redirects iff the predicate reports enabled
    /// and the request path is non-empty.
    pub fn evaluate(&self, view: &RequestView) -> Decision {
        if !self.state.xui_enabled() || view.path().is_empty() {
            return Decision::PassThrough;
        }

        let route = classify(view.path());
        let suffix = query_suffix(route, view, self.encoder.as_ref());
        Decision::Redirect {
            location: format!("{}{}", self.targets.for_route(route), suffix),
            route,
        }
    }

    pub fn targets(&self) -> &RedirectTargets {
        &self.targets
    }
}
