mod config;
mod db;
mod pages;
mod routes;
mod security;
mod session;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Missing .env is fine; required variables are enforced by Config::from_env.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("configuration");
    let pages = pages::PageRegistry::load(&config.public_dir).expect("page fragments");
    let sessions = session::SessionStore::new(config.session_ttl());
    let _sweep = session::spawn_expiry_sweep(sessions.clone());

    let port = config.port;
    let database_url = config.database_url.clone();

    // The listener must not bind until the database connection is live.
    db::after_connect(db::init_pool(&database_url), |pool| async move {
        let state = state::AppState::new(pool, Arc::new(pages), sessions, Arc::new(config));
        let app = routes::app(state);
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .expect("failed to bind");

        tracing::info!(%port, "riftview listening");
        axum::serve(listener, app).await.expect("server failed");
    })
    .await
    .expect("database connect failed");
}
