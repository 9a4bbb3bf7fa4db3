//! Route-guard decision and login return-path helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision, computed from the
//! current session state and the route's required-role set. The guard holds
//! no state; it is re-evaluated whenever the session changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Role;
use crate::routes::{AppRoute, DEFAULT_AUTHENTICATED};
use crate::state::session::{SessionReadiness, SessionState};

/// Outcome of evaluating a protected navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Bootstrap has not finished; show a waiting indicator, do not navigate.
    Loading,
    /// No session; go to login and come back to `from` afterwards.
    RedirectToLogin { from: String },
    /// Session present but the role is not admitted.
    RedirectToUnauthorized,
    Render,
}

/// Decide what a protected route shows.
pub fn evaluate_access(state: &SessionState, required: &[Role], requested: &str) -> GuardDecision {
    match state.readiness() {
        SessionReadiness::Loading => GuardDecision::Loading,
        SessionReadiness::Anonymous => GuardDecision::RedirectToLogin { from: requested.to_owned() },
        SessionReadiness::Authenticated => {
            if required.is_empty() || state.has_role(required) {
                GuardDecision::Render
            } else {
                GuardDecision::RedirectToUnauthorized
            }
        }
    }
}

/// The requested location as the guard records it: path plus query string.
pub fn requested_location(pathname: &str, search: &str) -> String {
    match search.trim_start_matches('?') {
        "" => pathname.to_owned(),
        query => format!("{pathname}?{query}"),
    }
}

/// Login URL carrying the originally requested location.
pub fn login_redirect_path(from: &str) -> String {
    let login = AppRoute::Login.path();
    match sanitize_return_to(Some(from)) {
        Some(target) if target != DEFAULT_AUTHENTICATED.path() => {
            format!("{login}?from={}", urlencoding::encode(target))
        }
        _ => login.to_owned(),
    }
}

/// Accept a return location only if it is a same-origin path to a known
/// protected route.
pub fn sanitize_return_to(from: Option<&str>) -> Option<&str> {
    let from = from?.trim();
    if !from.starts_with('/') || from.starts_with("//") {
        return None;
    }
    AppRoute::from_path(from).filter(|route| route.is_protected()).map(|_| from)
}

/// Where to go after a successful login.
pub fn post_login_destination(return_to: Option<&str>) -> String {
    sanitize_return_to(return_to).unwrap_or(DEFAULT_AUTHENTICATED.path()).to_owned()
}
