//! Query rewriting for redirect targets.
//!
//! # Responsibilities
//! - Produce the query suffix appended to the chosen redirect target
//! - Extract the composite-advice parameter on the login branch and
//!   re-express it as the two authentication-index parameters
//!
//! # Design Decisions
//! - The suffix is either empty or starts with `&`, never `?`: the
//!   targets end in fragment content and callers append directly
//! - Logout and profile pass the raw query through byte-for-byte; only
//!   the login-with-advice branch rebuilds and re-encodes parameters
//! - Encoding failures never abort the redirect: a failing parameter
//!   value is dropped, a failing advice value downgrades the response
//!   to the plain login shape

use crate::filter::classifier::RedirectRoute;
use crate::filter::encoder::QueryEncoder;
use crate::filter::targets::{
    AUTH_INDEX_TYPE_PAIR, AUTH_INDEX_VALUE_PARAM, COMPOSITE_ADVICE_PARAM,
};
use crate::filter::view::RequestView;

/// Build the query suffix for the given route.
pub fn query_suffix(route: RedirectRoute, view: &RequestView, encoder: &dyn QueryEncoder) -> String {
    match route {
        RedirectRoute::Logout | RedirectRoute::Profile => passthrough_suffix(view.raw_query()),
        RedirectRoute::Login => login_suffix(view, encoder),
    }
}

/// Pass the raw query through verbatim, `&`-prefixed when non-empty.
fn passthrough_suffix(raw_query: Option<&str>) -> String {
    match raw_query {
        None => String::new(),
        Some("") => String::new(),
        Some(q) if q.starts_with('&') => q.to_string(),
        Some(q) => format!("&{}", q),
    }
}

/// Login branch: rebuild the query around the composite-advice parameter
/// when one is present, otherwise fall back to the passthrough rule.
fn login_suffix(view: &RequestView, encoder: &dyn QueryEncoder) -> String {
    let advice = match view.params().first_ignore_ascii_case(COMPOSITE_ADVICE_PARAM) {
        Some(advice) => advice,
        None => return passthrough_suffix(view.raw_query()),
    };

    let encoded_advice = match encoder.encode(advice) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to encode composite advice; redirecting without authentication indexes"
            );
            return passthrough_suffix(view.raw_query());
        }
    };

    let mut query = String::new();
    for (name, values) in view.params().iter() {
        if name.eq_ignore_ascii_case(COMPOSITE_ADVICE_PARAM) {
            continue;
        }
        for value in values {
            match encoder.encode(value) {
                Ok(encoded) => query.push_str(&format!("&{}={}", name, encoded)),
                Err(e) => {
                    tracing::debug!(
                        parameter = name,
                        error = %e,
                        "Failed to encode parameter value; omitting it from the redirect query"
                    );
                }
            }
        }
    }
    query.push_str(&format!(
        "&{}&{}={}",
        AUTH_INDEX_TYPE_PAIR, AUTH_INDEX_VALUE_PARAM, encoded_advice
    ));
    query
}
