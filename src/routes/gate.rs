//! Blanket authorization gate.
//!
//! DESIGN
//! ======
//! A pure path policy plus the middleware that applies it. Public paths
//! pass through untouched; registered non-public paths require an
//! authenticated session (401 otherwise); anything else is 404. The
//! middleware is layered onto the page router only when
//! `GLOBAL_AUTH_GATE` is on — in the default narrow mode the only active
//! check is the signup handler's own logged-in rejection.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::pages::{NOTICE_NOT_AUTHORIZED, NOTICE_NOT_FOUND};
use crate::state::AppState;

use super::session::Visitor;

/// Paths every visitor may reach, logged in or not. Built once; the gate
/// consults it before any auth check.
pub const PUBLIC_PATHS: &[&str] = &["/", "/login", "/signup"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forward to the handler.
    Forward,
    /// Registered path, session not authenticated: 401.
    Unauthorized,
    /// Not a registered route: 404.
    NotFound,
}

/// Decide what the gate does with `path` for a session in the given state.
#[must_use]
pub fn decide(path: &str, logged_in: bool) -> Decision {
    if PUBLIC_PATHS.contains(&path) {
        return Decision::Forward;
    }
    if !is_registered(path) {
        return Decision::NotFound;
    }
    if logged_in { Decision::Forward } else { Decision::Unauthorized }
}

/// Registered non-public routes: `/link-account` and the parameterized
/// profile path with exactly two non-empty segments.
fn is_registered(path: &str) -> bool {
    if path == "/link-account" {
        return true;
    }
    match path.strip_prefix("/profile/") {
        Some(rest) => {
            let mut segments = rest.split('/');
            let summoner = segments.next().unwrap_or("");
            let region = segments.next().unwrap_or("");
            !summoner.is_empty() && !region.is_empty() && segments.next().is_none()
        }
        None => false,
    }
}

/// Middleware applying [`decide`] with rendered notices.
pub async fn enforce(
    State(state): State<AppState>,
    visitor: Visitor,
    req: Request,
    next: Next,
) -> Response {
    match decide(req.uri().path(), visitor.0.logged_in()) {
        Decision::Forward => next.run(req).await,
        Decision::Unauthorized => {
            (StatusCode::UNAUTHORIZED, Html(state.pages.notice(NOTICE_NOT_AUTHORIZED))).into_response()
        }
        Decision::NotFound => {
            (StatusCode::NOT_FOUND, Html(state.pages.notice(NOTICE_NOT_FOUND))).into_response()
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
