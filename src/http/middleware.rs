//! Request interception middleware.
//!
//! # Responsibilities
//! - Decide per request whether to redirect to XUI or forward upstream
//! - Emit the 302 response with a sanitized Location header
//! - Record redirect metrics
//!
//! # Data Flow
//! ```text
//! request → scope check (context path + prefixes)
//!     → outside scope: next.run (forward upstream)
//!     → inside scope: XuiFilter::evaluate
//!         → PassThrough: next.run
//!         → Redirect: 302 + Location header
//! ```

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::filter::{Decision, RequestView};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Intercept classic UI requests and answer them with a redirect to the
/// XUI fragment target; everything else continues to the upstream.
pub async fn xui_redirect_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();

    if !state.scope.intercepts(request.uri().path()) {
        return next.run(request).await;
    }

    let view = RequestView::from_uri(request.uri());
    match state.filter.evaluate(&view) {
        Decision::PassThrough => next.run(request).await,
        Decision::Redirect { location, route } => {
            // Location header values must not contain CR or LF.
            let safe: String = location
                .chars()
                .filter(|c| *c != '\r' && *c != '\n')
                .collect();

            tracing::debug!(
                path = %view.path(),
                route = route.label(),
                location = %safe,
                "Redirecting classic UI request to XUI"
            );
            metrics::record_request("redirect", route.label(), start_time);

            (StatusCode::FOUND, [(header::LOCATION, safe)]).into_response()
        }
    }
}
