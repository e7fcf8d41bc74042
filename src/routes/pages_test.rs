use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::pages::{NOTICE_ALREADY_LOGGED_IN, NOTICE_NOT_AUTHORIZED, NOTICE_NOT_FOUND};
use crate::routes::app;
use crate::session;
use crate::state::AppState;
use crate::state::test_helpers::*;

async fn get(app: Router, path: &str, cookie: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Seed an authenticated session and return its `Cookie` header value.
async fn logged_in_cookie(state: &AppState) -> String {
    let (token, _) = state.sessions.open(None).await;
    state.sessions.login(&token).await;
    let value = session::cookie_value(&token, state.config.signing_secret());
    format!("{}={}", state.config.cookie_name, value)
}

fn composed(body: &str) -> String {
    format!("{TEST_HEADER}{body}{TEST_FOOTER}")
}

// =============================================================================
// narrow mode (default): only /signup is actively gated
// =============================================================================

#[tokio::test]
async fn frontpage_serves_composed_page_for_anonymous() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>frontpage</main>"));
}

#[tokio::test]
async fn frontpage_is_identical_when_logged_in() {
    let state = test_app_state(test_config());
    let cookie = logged_in_cookie(&state).await;
    let (status, body) = get(app(state), "/", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>frontpage</main>"));
}

#[tokio::test]
async fn login_page_is_public() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/login", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>login</main>"));
}

#[tokio::test]
async fn signup_serves_page_for_anonymous() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/signup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>signup</main>"));
}

#[tokio::test]
async fn signup_rejects_logged_in_visitors() {
    let state = test_app_state(test_config());
    let cookie = logged_in_cookie(&state).await;
    let (status, body) = get(app(state), "/signup", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains(NOTICE_ALREADY_LOGGED_IN));
    assert!(body.starts_with(TEST_HEADER));
}

#[tokio::test]
async fn link_account_is_unenforced_in_narrow_mode() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/link-account", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>link-account</main>"));
}

#[tokio::test]
async fn profile_is_unenforced_in_narrow_mode() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/profile/Faker/kr", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>profile</main>"));
}

#[tokio::test]
async fn profile_path_params_do_not_change_the_page() {
    let state = test_app_state(test_config());
    let (_, body_a) = get(app(state.clone()), "/profile/Faker/kr", None).await;
    let (_, body_b) = get(app(state), "/profile/Uzi/cn", None).await;
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn unknown_path_renders_styled_not_found() {
    let state = test_app_state(test_config());
    let (status, body) = get(app(state), "/nonexistent-path", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains(NOTICE_NOT_FOUND));
}

// =============================================================================
// blanket-gate mode
// =============================================================================

fn gated_config() -> crate::config::Config {
    let mut config = test_config();
    config.global_gate = true;
    config
}

#[tokio::test]
async fn gated_public_pages_stay_open() {
    let state = test_app_state(gated_config());
    for path in ["/", "/login", "/signup"] {
        let (status, _) = get(app(state.clone()), path, None).await;
        assert_eq!(status, StatusCode::OK, "{path} should stay public");
    }
}

#[tokio::test]
async fn gated_link_account_requires_login() {
    let state = test_app_state(gated_config());
    let (status, body) = get(app(state.clone()), "/link-account", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains(NOTICE_NOT_AUTHORIZED));

    let cookie = logged_in_cookie(&state).await;
    let (status, body) = get(app(state), "/link-account", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, composed("<main>link-account</main>"));
}

#[tokio::test]
async fn gated_profile_requires_login() {
    let state = test_app_state(gated_config());
    let (status, _) = get(app(state.clone()), "/profile/Faker/kr", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = logged_in_cookie(&state).await;
    let (status, _) = get(app(state), "/profile/Faker/kr", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn gated_signup_still_rejects_logged_in_visitors() {
    let state = test_app_state(gated_config());
    let cookie = logged_in_cookie(&state).await;
    let (status, body) = get(app(state), "/signup", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains(NOTICE_ALREADY_LOGGED_IN));
}

#[tokio::test]
async fn gated_unknown_path_is_not_found_for_any_state() {
    let state = test_app_state(gated_config());
    let (status, _) = get(app(state.clone()), "/nonexistent-path", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let cookie = logged_in_cookie(&state).await;
    let (status, body) = get(app(state), "/nonexistent-path", Some(&cookie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains(NOTICE_NOT_FOUND));
}

// =============================================================================
// forged cookies
// =============================================================================

#[tokio::test]
async fn forged_cookie_is_treated_as_anonymous() {
    let state = test_app_state(test_config());
    let (token, _) = state.sessions.open(None).await;
    state.sessions.login(&token).await;

    // Right token, wrong signature: the gate must not trust it.
    let cookie = format!("{}={token}.deadbeef", state.config.cookie_name);
    let (status, _) = get(app(state), "/signup", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
}
