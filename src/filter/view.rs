//! Read-only projection of an incoming request.
//!
//! # Responsibilities
//! - Expose the request path and the raw (undecoded) query string
//! - Expose a decoded parameter map in a deterministic traversal order
//!
//! # Design Decisions
//! - Parameter names keep their first-appearance order; values within a
//!   name keep their arrival order. The rewriter's output is therefore
//!   deterministic for a given query string.
//! - Decoding follows `application/x-www-form-urlencoded` rules (`+` is
//!   a space, `%XX` sequences are resolved).

use axum::http::Uri;
use url::form_urlencoded;

/// Decoded query parameters, grouped by name.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ParamMap {
    /// Decode a raw query string into a grouped parameter map.
    pub fn parse(raw_query: &str) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in form_urlencoded::parse(raw_query.as_bytes()) {
            match entries.iter().position(|(n, _)| n.as_str() == name.as_ref()) {
                Some(i) => entries[i].1.push(value.into_owned()),
                None => entries.push((name.into_owned(), vec![value.into_owned()])),
            }
        }
        Self { entries }
    }

    /// Iterate entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// First value of the first entry whose name matches `name`
    /// ignoring ASCII case.
    pub fn first_ignore_ascii_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }
}

/// Read-only view of one request, alive for the request's lifetime.
#[derive(Debug, Clone)]
pub struct RequestView {
    path: String,
    raw_query: Option<String>,
    params: ParamMap,
}

impl RequestView {
    pub fn new(path: &str, raw_query: Option<&str>) -> Self {
        let params = raw_query.map(ParamMap::parse).unwrap_or_default();
        Self {
            path: path.to_string(),
            raw_query: raw_query.map(str::to_string),
            params,
        }
    }

    pub fn from_uri(uri: &Uri) -> Self {
        Self::new(uri.path(), uri.query())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string exactly as it arrived, without the leading `?`.
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }
}
