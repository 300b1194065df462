use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use smarttech_core::health::{healthz, readiness};
use smarttech_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{
        create_password, forgot_password, login, logout, register, reset_password, verify_otp,
    },
    oauth::{facebook_login, facebook_redirect, google_login, google_redirect},
    token::{check_token, refresh_token},
};
use crate::state::AppState;

/// `GET /readyz`: ping PostgreSQL and Redis.
async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = state.db.ping().await.is_ok();
    let redis = match state.redis.get().await {
        Ok(mut conn) => deadpool_redis::redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok(),
        Err(_) => false,
    };
    readiness(&[("database", database), ("redis", redis)])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/auth/register", post(register))
        .route("/auth/otp/resend", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/create-password", post(create_password))
        // Session
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/token", get(check_token))
        // Password reset
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        // OAuth
        .route("/auth/google", get(google_login))
        .route("/auth/google/redirect", get(google_redirect))
        .route("/auth/facebook", get(facebook_login))
        .route("/auth/facebook/redirect", get(facebook_redirect))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
