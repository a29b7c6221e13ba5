//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate address shapes (listener, upstream, metrics, admin)
//! - Validate the context path and interception prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<_>>
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstream.address `{0}` is not a valid host:port authority")]
    InvalidUpstreamAddress(String),

    #[error("upstream.context_path `{0}` must be empty or start with `/` and not end with `/`")]
    InvalidContextPath(String),

    #[error("xui.intercept_prefixes must not be empty")]
    EmptyInterceptPrefixes,

    #[error("xui.intercept_prefixes entry `{0}` must start with `/`")]
    InvalidInterceptPrefix(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("admin.bind_address `{0}` is not a valid socket address")]
    InvalidAdminBindAddress(String),

    #[error("admin.api_key must not be empty when the admin API is enabled")]
    EmptyAdminApiKey,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if Authority::from_str(&config.upstream.address).is_err() {
        errors.push(ValidationError::InvalidUpstreamAddress(
            config.upstream.address.clone(),
        ));
    }

    let context_path = &config.upstream.context_path;
    if !context_path.is_empty() && (!context_path.starts_with('/') || context_path.ends_with('/')) {
        errors.push(ValidationError::InvalidContextPath(context_path.clone()));
    }

    if config.xui.intercept_prefixes.is_empty() {
        errors.push(ValidationError::EmptyInterceptPrefixes);
    }
    for prefix in &config.xui.intercept_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidInterceptPrefix(prefix.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let log_level = &config.observability.log_level;
    if !LOG_LEVELS.iter().any(|l| l.eq_ignore_ascii_case(log_level)) {
        errors.push(ValidationError::InvalidLogLevel(log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.admin.enabled {
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAdminBindAddress(
                config.admin.bind_address.clone(),
            ));
        }
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::EmptyAdminApiKey);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
