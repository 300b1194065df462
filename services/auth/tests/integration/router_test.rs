//! HTTP surface checks that never reach PostgreSQL or Redis.

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use smarttech_auth::infra::oauth::{FacebookProvider, GoogleProvider, OAuthClientConfig};
use smarttech_auth::router::build_router;
use smarttech_auth::state::AppState;
use smarttech_auth::usecase::token::CreateTokenPayload;
use smarttech_auth_types::cookie::{OAUTH_STATE_COOKIE, REFRESH_TOKEN_COOKIE};
use smarttech_domain::id::UserId;
use smarttech_domain::user::UserRole;
use smarttech_testing::auth::{bearer_headers, refresh_cookie};
use smarttech_testing::clock::ManualClock;

use crate::helpers::{MemoryBlacklist, token_service, token_settings};

fn oauth_config(provider: &str) -> OAuthClientConfig {
    OAuthClientConfig {
        client_id: format!("{provider}-client"),
        client_secret: "secret".to_owned(),
        callback_url: format!("https://api.example.com/auth/{provider}/redirect"),
    }
}

fn server() -> TestServer {
    // Nothing listens on port 1; the pool only dials on first use.
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let http = reqwest::Client::new();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        redis,
        tokens: token_settings(),
        otp_ttl_secs: 300,
        cookie_domain: "example.com".to_owned(),
        frontend_redirect_url: "https://shop.example.com".to_owned(),
        google: GoogleProvider {
            http: http.clone(),
            config: oauth_config("google"),
        },
        facebook: FacebookProvider {
            http,
            config: oauth_config("facebook"),
        },
    };
    TestServer::new(build_router(state)).unwrap()
}

/// An access token signed with the test secret whose `exp` is long past.
fn expired_access_token() -> String {
    let clock = ManualClock::at(1_000);
    let tokens = token_service(MemoryBlacklist::new(clock.clone()), clock);
    tokens
        .create_token_pairs(CreateTokenPayload {
            sub: UserId::new(),
            role: UserRole::User,
        })
        .unwrap()
        .access_token
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_liveness_with_request_id() {
    let res = server().get("/healthz").await;
    res.assert_status_ok();
    assert!(!res.header("x-request-id").is_empty());
}

#[tokio::test]
async fn should_report_unready_dependencies() {
    let res = server().get("/readyz").await;
    res.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json();
    assert_eq!(body["database"], "unavailable");
    assert_eq!(body["redis"], "unavailable");
}

// ── Input validation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_malformed_email() {
    let res = server()
        .post("/auth/register")
        .json(&json!({ "email": "not-an-email" }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "email: must be a valid email");
}

#[tokio::test]
async fn should_enforce_password_policy() {
    let res = server()
        .post("/auth/create-password")
        .json(&json!({ "email": "a@x.com", "password": "password" }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["message"], "password: must contain an uppercase letter");
}

#[tokio::test]
async fn should_reject_non_numeric_otp() {
    for path in ["/auth/verify-otp", "/auth/reset-password"] {
        let res = server()
            .post(path)
            .json(&json!({ "email": "a@x.com", "otpCode": "12ab56" }))
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
    }
}

// ── Token guard ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_bearer_token_for_logout() {
    let res = server().post("/auth/logout").await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_forged_access_token() {
    let mut req = server().get("/auth/token");
    for (name, value) in bearer_headers("forged.token.value").iter() {
        req = req.add_header(name.clone(), value.clone());
    }
    let res = req.await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_tell_client_when_access_token_expired() {
    let res = server()
        .get("/auth/token")
        .authorization_bearer(expired_access_token())
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn should_require_refresh_cookie() {
    let res = server().post("/auth/refresh").await;
    res.assert_status(StatusCode::UNAUTHORIZED);

    let res = server()
        .post("/auth/refresh")
        .add_header(header::COOKIE, refresh_cookie("garbage"))
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}

// ── OAuth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redirect_to_google_with_state_cookie() {
    let res = server().get("/auth/google").await;
    res.assert_status(StatusCode::SEE_OTHER);

    let state = res.cookie(OAUTH_STATE_COOKIE);
    assert!(!state.value().is_empty());
    assert_eq!(state.path(), Some("/auth"));

    let location = res.header(header::LOCATION);
    let url = url::Url::parse(location.to_str().unwrap()).unwrap();
    assert_eq!(url.host_str(), Some("accounts.google.com"));
    let sent_state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned());
    assert_eq!(sent_state.as_deref(), Some(state.value()));
}

#[tokio::test]
async fn should_redirect_to_facebook() {
    let res = server().get("/auth/facebook").await;
    res.assert_status(StatusCode::SEE_OTHER);
    let location = res.header(header::LOCATION);
    assert!(
        location
            .to_str()
            .unwrap()
            .starts_with("https://www.facebook.com/")
    );
}

#[tokio::test]
async fn should_reject_callback_with_mismatched_state() {
    let res = server()
        .get("/auth/google/redirect")
        .add_query_param("code", "abc")
        .add_query_param("state", "forged")
        .add_header(
            header::COOKIE,
            header::HeaderValue::from_static("oauthState=expected"),
        )
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert!(res.maybe_cookie(REFRESH_TOKEN_COOKIE).is_none());
}

#[tokio::test]
async fn should_reject_declined_consent() {
    let res = server()
        .get("/auth/facebook/redirect")
        .add_query_param("error", "access_denied")
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}
