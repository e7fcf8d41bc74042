//! Session attachment middleware and the session API surface.
//!
//! ARCHITECTURE
//! ============
//! `attach` runs ahead of every route: it resolves the signed session
//! cookie, opens (or mints) the store record, and inserts a
//! `SessionContext` into the request so handlers can extract a `Visitor`.
//! It never terminates a request itself; the operation is total. The
//! response leaves with a re-issued cookie, giving the rolling
//! inactivity window.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use crate::session::{self, AuthState};
use crate::state::AppState;

/// Per-request session context, inserted by [`attach`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: String,
    pub auth: AuthState,
}

impl SessionContext {
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.auth.is_logged_in()
    }
}

/// The current client's session, as seen at the start of the request.
/// Use as a handler parameter; present on every request behind [`attach`].
pub struct Visitor(pub SessionContext);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(Self)
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Attach a session to the request and re-issue the cookie on the response.
pub async fn attach(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = jar
        .get(&state.config.cookie_name)
        .map(Cookie::value)
        .and_then(|value| session::verify_cookie_value(value, &state.config.session_secrets));

    let (token, auth) = state.sessions.open(presented.as_deref()).await;
    let value = session::cookie_value(&token, state.config.signing_secret());
    req.extensions_mut().insert(SessionContext { token, auth });

    let response = next.run(req).await;

    // Not HTTPS-only, readable by scripts, same-site restricted; expiry
    // matches the store's inactivity window.
    let cookie = Cookie::build((state.config.cookie_name.clone(), value))
        .path("/")
        .secure(false)
        .http_only(false)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(
            i64::try_from(state.config.session_ttl_secs).unwrap_or(600),
        ));

    (jar.add(cookie), response).into_response()
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub logged_in: bool,
}

/// `GET /api/session` — current auth state, read live from the store.
pub async fn current(State(state): State<AppState>, visitor: Visitor) -> Json<SessionInfo> {
    let auth = state
        .sessions
        .auth_state(&visitor.0.token)
        .await
        .unwrap_or(AuthState::Anonymous);
    Json(SessionInfo { logged_in: auth.is_logged_in() })
}

/// `POST /api/session/logout` — destroy the session.
pub async fn logout(State(state): State<AppState>, visitor: Visitor) -> StatusCode {
    state.sessions.logout(&visitor.0.token).await;
    StatusCode::NO_CONTENT
}

/// `POST /api/dev/login` — development-only credential-less login.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`; hidden otherwise.
pub async fn dev_login(State(state): State<AppState>, visitor: Visitor) -> StatusCode {
    if !state.config.dev_auth_bypass {
        return StatusCode::NOT_FOUND;
    }

    if state.sessions.login(&visitor.0.token).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
