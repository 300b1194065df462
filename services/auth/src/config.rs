use anyhow::Context as _;

use crate::domain::types::DEFAULT_OTP_TTL_SECS;
use crate::infra::oauth::OAuthClientConfig;

const DEFAULT_AUTH_PORT: u16 = 3112;
const DEFAULT_ACCESS_TOKEN_EXPIRES_IN: u64 = 15 * 60;
const DEFAULT_REFRESH_TOKEN_EXPIRES_IN: u64 = 7 * 24 * 60 * 60;

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for access tokens. Env var: `ACCESS_TOKEN_SECRET`.
    pub access_token_secret: String,
    /// HMAC secret for refresh tokens. Env var: `REFRESH_TOKEN_SECRET`.
    pub refresh_token_secret: String,
    /// Access-token lifetime in seconds (default 900).
    pub access_token_expires_in: u64,
    /// Refresh-token lifetime in seconds (default 7 days).
    pub refresh_token_expires_in: u64,
    /// OTP lifetime in seconds (default 300). Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: u64,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Storefront origin that receives the access token after OAuth login.
    pub frontend_redirect_url: String,
    pub google: OAuthClientConfig,
    pub facebook: OAuthClientConfig,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {name}"))
}

fn optional<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(v) => v.parse().with_context(|| format!("invalid {name}: {v:?}")),
        Err(_) => Ok(default),
    }
}

fn oauth_client(prefix: &str) -> anyhow::Result<OAuthClientConfig> {
    Ok(OAuthClientConfig {
        client_id: required(&format!("{prefix}_CLIENT_ID"))?,
        client_secret: required(&format!("{prefix}_CLIENT_SECRET"))?,
        callback_url: required(&format!("{prefix}_CALLBACK_URL"))?,
    })
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            access_token_secret: required("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: required("REFRESH_TOKEN_SECRET")?,
            access_token_expires_in: optional(
                "ACCESS_TOKEN_EXPIRES_IN",
                DEFAULT_ACCESS_TOKEN_EXPIRES_IN,
            )?,
            refresh_token_expires_in: optional(
                "REFRESH_TOKEN_EXPIRES_IN",
                DEFAULT_REFRESH_TOKEN_EXPIRES_IN,
            )?,
            otp_ttl_secs: optional("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS)?,
            cookie_domain: required("COOKIE_DOMAIN")?,
            auth_port: optional("AUTH_PORT", DEFAULT_AUTH_PORT)?,
            frontend_redirect_url: required("FRONTEND_REDIRECT_URL")?
                .trim_end_matches('/')
                .to_owned(),
            google: oauth_client("GOOGLE")?,
            facebook: oauth_client("FACEBOOK")?,
        })
    }
}
