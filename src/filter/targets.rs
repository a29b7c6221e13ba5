//! Redirect targets and domain constants.

use crate::filter::classifier::RedirectRoute;

/// Request parameter carrying an authentication-policy advice token.
/// Matched case-insensitively wherever it is looked up.
pub const COMPOSITE_ADVICE_PARAM: &str = "sunamcompositeadvice";

/// Synthesized pair announcing the advice-based authentication index.
pub const AUTH_INDEX_TYPE_PAIR: &str = "authIndexType=composite_advice";

/// Name of the synthesized parameter carrying the re-encoded advice.
pub const AUTH_INDEX_VALUE_PARAM: &str = "authIndexValue";

const XUI_LOGIN_SUFFIX: &str = "/XUI/#login/";
const XUI_LOGOUT_SUFFIX: &str = "/XUI/#logout/";
const XUI_PROFILE_SUFFIX: &str = "/XUI/#profile/";

/// The three XUI redirect targets, compiled once at filter initialization.
///
/// Each target is the context base path followed by a fragment prefix.
/// The fragment is part of the target: query suffixes are appended after
/// it and parsed client-side by the XUI router.
#[derive(Debug, Clone)]
pub struct RedirectTargets {
    login: String,
    logout: String,
    profile: String,
}

impl RedirectTargets {
    /// Compile the targets from the context base path (e.g. `/openam`).
    pub fn new(context_path: &str) -> Self {
        Self {
            login: format!("{}{}", context_path, XUI_LOGIN_SUFFIX),
            logout: format!("{}{}", context_path, XUI_LOGOUT_SUFFIX),
            profile: format!("{}{}", context_path, XUI_PROFILE_SUFFIX),
        }
    }

    /// Target for the given route.
    pub fn for_route(&self, route: RedirectRoute) -> &str {
        match route {
            RedirectRoute::Login => &self.login,
            RedirectRoute::Logout => &self.logout,
            RedirectRoute::Profile => &self.profile,
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn logout(&self) -> &str {
        &self.logout
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_context_base() {
        let targets = RedirectTargets::new("/openam");
        assert_eq!(targets.login(), "/openam/XUI/#login/");
        assert_eq!(targets.logout(), "/openam/XUI/#logout/");
        assert_eq!(targets.profile(), "/openam/XUI/#profile/");
        for target in [targets.login(), targets.logout(), targets.profile()] {
            assert!(target.starts_with("/openam/XUI/#"));
        }
    }

    #[test]
    fn test_empty_context_path() {
        let targets = RedirectTargets::new("");
        assert_eq!(targets.login(), "/XUI/#login/");
    }

    #[test]
    fn test_for_route_selects_matching_target() {
        let targets = RedirectTargets::new("/openam");
        assert_eq!(targets.for_route(RedirectRoute::Logout), targets.logout());
        assert_eq!(targets.for_route(RedirectRoute::Profile), targets.profile());
        assert_eq!(targets.for_route(RedirectRoute::Login), targets.login());
    }
}
