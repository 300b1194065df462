use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use smarttech_auth::config::AuthConfig;
use smarttech_auth::infra::oauth::{FacebookProvider, GoogleProvider};
use smarttech_auth::router::build_router;
use smarttech_auth::state::AppState;
use smarttech_auth::usecase::token::TokenSettings;
use smarttech_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AuthConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create Redis pool")?;

    let http = reqwest::Client::new();

    let state = AppState {
        db,
        redis,
        tokens: TokenSettings {
            access_secret: config.access_token_secret,
            refresh_secret: config.refresh_token_secret,
            access_ttl: config.access_token_expires_in,
            refresh_ttl: config.refresh_token_expires_in,
        },
        otp_ttl_secs: config.otp_ttl_secs,
        cookie_domain: config.cookie_domain,
        frontend_redirect_url: config.frontend_redirect_url,
        google: GoogleProvider {
            http: http.clone(),
            config: config.google,
        },
        facebook: FacebookProvider {
            http,
            config: config.facebook,
        },
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
