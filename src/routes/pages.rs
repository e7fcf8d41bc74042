//! Page handlers — serve the composed registry entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::pages::{NOTICE_ALREADY_LOGGED_IN, NOTICE_NOT_FOUND};
use crate::state::AppState;

use super::session::Visitor;

/// `GET /` — frontpage, visible in any session state.
pub async fn frontpage(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.frontpage.clone())
}

/// `GET /login`
pub async fn login(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.login.clone())
}

/// `GET /signup` — rejected when the visitor is already logged in. This
/// check is active in both gate modes.
pub async fn signup(State(state): State<AppState>, visitor: Visitor) -> Response {
    if visitor.0.logged_in() {
        return (StatusCode::UNAUTHORIZED, Html(state.pages.notice(NOTICE_ALREADY_LOGGED_IN)))
            .into_response();
    }
    Html(state.pages.signup.clone()).into_response()
}

/// `GET /link-account`
pub async fn link_account(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.link_account.clone())
}

/// `GET /profile/{summoner_name}/{region}` — the page shell only; the
/// path parameters are consumed client-side by the profile scripts.
pub async fn profile(
    State(state): State<AppState>,
    Path((_summoner_name, _region)): Path<(String, String)>,
) -> Html<String> {
    Html(state.pages.profile.clone())
}

/// Styled not-found page for paths that match neither a route nor a file.
pub async fn not_found(State(state): State<AppState>) -> Response {
    (StatusCode::NOT_FOUND, Html(state.pages.notice(NOTICE_NOT_FOUND))).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
