//! Interception scope matching.

/// Paths the redirect filter applies to, compiled from configuration at
/// startup and immutable at runtime.
///
/// A request is in scope when its path lies under the context base path
/// and the remainder starts with one of the configured prefixes. The XUI
/// assets themselves (`<base>/XUI/...`) stay out of scope and forward
/// upstream untouched.
#[derive(Debug, Clone)]
pub struct InterceptScope {
    context_path: String,
    prefixes: Vec<String>,
}

impl InterceptScope {
    pub fn new(context_path: &str, prefixes: &[String]) -> Self {
        Self {
            context_path: context_path.to_string(),
            prefixes: prefixes.to_vec(),
        }
    }

    /// Returns true if the filter should see this path.
    pub fn intercepts(&self, path: &str) -> bool {
        let relative = match path.strip_prefix(self.context_path.as_str()) {
            Some(rest) => rest,
            None => return false,
        };
        self.prefixes.iter().any(|p| relative.starts_with(p.as_str()))
    }
}
