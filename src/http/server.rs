//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the forwarding handler
//! - Wire up middleware (request ID, tracing, timeout, XUI interception)
//! - Apply live configuration updates (XUI flag)
//! - Forward non-intercepted requests to the upstream server
//! - Observability (metrics, correlation IDs)

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::uri::{Authority, PathAndQuery, Scheme},
    http::{Request, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::filter::{XuiFilter, XuiFlag};
use crate::http::middleware::xui_redirect_middleware;
use crate::observability::metrics;
use crate::routing::InterceptScope;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub filter: Arc<XuiFilter>,
    pub scope: Arc<InterceptScope>,
    pub flag: XuiFlag,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
    pub config: Arc<GatewayConfig>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The flag is shared: the admin API and the config watcher write
    /// it while request handling reads it.
    ///
    /// # Panics
    ///
    /// Panics if `config.upstream.address` is not a `host:port`
    /// authority. Configs that came through `load_config` have already
    /// been validated and never trip this.
    pub fn new(config: GatewayConfig, flag: XuiFlag) -> Self {
        let config = Arc::new(config);

        let filter = Arc::new(XuiFilter::new(
            &config.upstream.context_path,
            Arc::new(flag.clone()),
        ));
        let scope = Arc::new(InterceptScope::new(
            &config.upstream.context_path,
            &config.xui.intercept_prefixes,
        ));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let upstream = Authority::from_str(&config.upstream.address)
            .expect("upstream.address must be a host:port authority");

        let state = AppState {
            filter,
            scope,
            flag,
            client,
            upstream,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            state,
            config,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                xui_redirect_middleware,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates from the file watcher arrive on
    /// `config_updates`; only the XUI flag is applied live.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        tokio::spawn(apply_config_updates(
            self.config.clone(),
            self.state.flag.clone(),
            config_updates,
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a clone of the application state, for the admin router.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Apply configuration updates delivered by the file watcher.
///
/// Only `xui.enabled` changes take effect live; any other difference is
/// logged as requiring a restart.
async fn apply_config_updates(
    current: Arc<GatewayConfig>,
    flag: XuiFlag,
    mut updates: mpsc::UnboundedReceiver<GatewayConfig>,
) {
    while let Some(new_config) = updates.recv().await {
        if new_config.xui.enabled != flag.enabled() {
            flag.set(new_config.xui.enabled);
            tracing::info!(
                enabled = new_config.xui.enabled,
                "XUI flag updated from config file"
            );
        }

        if new_config.listener != current.listener
            || new_config.upstream != current.upstream
            || new_config.xui.intercept_prefixes != current.xui.intercept_prefixes
            || new_config.timeouts != current.timeouts
            || new_config.observability != current.observability
            || new_config.admin != current.admin
        {
            tracing::warn!("Config changes beyond xui.enabled require a restart to take effect");
        }
    }
}

/// Forward a request to the fixed upstream server.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    tracing::debug!(
        method = %method,
        path = %path,
        "Forwarding request upstream"
    );

    let (mut parts, body) = request.into_parts();

    // URI rewrite: same path and query, upstream authority.
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts).unwrap_or(parts.uri);

    let request = Request::from_parts(parts, body);

    match state.client.request(request).await {
        Ok(response) => {
            metrics::record_request("forward", "none", start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %path,
                "Upstream error"
            );
            metrics::record_upstream_error();
            metrics::record_request("upstream_error", "none", start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
