//! Route classification for intercepted requests.
//!
//! # Responsibilities
//! - Map the request path onto one of the three XUI destinations
//! - Substring containment, case-sensitive, first match wins
//!
//! # Design Decisions
//! - The two classic-UI endpoints get dedicated targets; everything else
//!   that reached the filter falls through to the login flow
//! - No normalization: the markers match the paths the classic UI emits

const LOGOUT_MARKER: &str = "UI/Logout";
const PROFILE_MARKER: &str = "idm/EndUser";

/// Destination selected for a redirected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectRoute {
    Logout,
    Profile,
    Login,
}

impl RedirectRoute {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RedirectRoute::Logout => "logout",
            RedirectRoute::Profile => "profile",
            RedirectRoute::Login => "login",
        }
    }
}

/// Classify a request path, first match wins.
pub fn classify(path: &str) -> RedirectRoute {
    if path.contains(LOGOUT_MARKER) {
        RedirectRoute::Logout
    } else if path.contains(PROFILE_MARKER) {
        RedirectRoute::Profile
    } else {
        RedirectRoute::Login
    }
}
