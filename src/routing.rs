//! Client-side routes and their gating rules
//!
//! `disposition` is the whole state machine from the app shell's point of
//! view: given a route and the current gate state, it says whether to
//! render, hold on a placeholder, or redirect.

use crate::session::{AuthStatus, GateState};

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/` - protected search view
    Search,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/details/{id}` - protected detail view
    Details(i64),
}

impl Route {
    /// Parse a location path into a route
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Search),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            _ => path
                .strip_prefix("/details/")
                .and_then(|id| id.parse().ok())
                .map(Route::Details),
        }
    }

    /// The location path for this route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Search => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Details(id) => format!("/details/{id}"),
        }
    }

    /// Whether the route requires an authenticated principal
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Search | Route::Details(_))
    }
}

/// What the app shell should do for a route under the current gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Neutral placeholder while the auth status is still unknown.
    /// Never protected content, never a redirect.
    Checking,
    /// Render the route's view
    Render,
    /// Unauthenticated on a protected view: go to login
    RedirectToLogin,
    /// Authenticated on a login or registration view: go to the default
    /// protected view
    RedirectToHome,
}

/// Decide how to treat `route` under `state`.
#[must_use]
pub fn disposition(route: Route, state: &GateState) -> Disposition {
    match state.status {
        AuthStatus::Unknown => {
            if route.is_protected() {
                Disposition::Checking
            } else {
                Disposition::Render
            }
        }
        AuthStatus::Authenticated => match route {
            Route::Login | Route::Register => Disposition::RedirectToHome,
            _ => Disposition::Render,
        },
        AuthStatus::Unauthenticated => {
            if route.is_protected() {
                Disposition::RedirectToLogin
            } else {
                Disposition::Render
            }
        }
    }
}
