//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page routes and the session API sit behind the session-attach middleware
//! so every handler sees a defined auth state. Static assets are served as
//! the fallback, mirroring the static-files-first ordering of the page
//! design, with a styled 404 for paths that are neither a route nor a file.
//! When the global gate is enabled the page router additionally enforces
//! the path authorization policy.

pub mod gate;
pub mod pages;
pub mod session;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{any, get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::security;
use crate::state::AppState;

/// Build the application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let mut page_routes = Router::new()
        .route("/", get(pages::frontpage))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/link-account", get(pages::link_account))
        .route("/profile/{summoner_name}/{region}", get(pages::profile));

    if state.config.global_gate {
        page_routes = page_routes.layer(middleware::from_fn_with_state(state.clone(), gate::enforce));
    }

    let session_routes = Router::new()
        .route("/api/session", get(session::current))
        .route("/api/session/logout", post(session::logout))
        .route("/api/dev/login", post(session::dev_login))
        .route("/healthz", get(healthz));

    // Unmatched paths fall through to the public directory; files that do
    // not exist there either get the styled not-found page.
    let static_assets = ServeDir::new(&state.config.public_dir)
        .not_found_service(any(pages::not_found).with_state(state.clone()));

    Router::new()
        .merge(session_routes)
        .merge(page_routes)
        .fallback_service(static_assets)
        .layer(middleware::from_fn_with_state(state.clone(), session::attach))
        .layer(security::csp_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /healthz` — liveness plus a database ping.
async fn healthz(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "healthz database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
