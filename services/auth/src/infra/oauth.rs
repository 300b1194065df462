//! Google and Facebook authorization-code clients.

use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

use smarttech_domain::user::AuthProvider;

use crate::domain::repository::OAuthProvider;
use crate::domain::types::SocialProfile;
use crate::error::AuthServiceError;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const FACEBOOK_AUTHORIZE_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const FACEBOOK_TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/v19.0/me";

/// Client credentials registered with a provider.
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

fn authorize_url(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.into(),
        // Bases are compile-time constants; parsing cannot fail.
        Err(_) => base.to_owned(),
    }
}

/// A provider refusing the code is the caller's problem; anything else is ours.
async fn read_json<T: serde::de::DeserializeOwned>(
    res: reqwest::Response,
    what: &'static str,
) -> Result<T, AuthServiceError> {
    let status = res.status();
    if status.is_client_error() {
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(%status, body = %body, "{what} rejected");
        return Err(AuthServiceError::Unauthorized);
    }
    let res = res.error_for_status().with_context(|| what)?;
    Ok(res.json::<T>().await.with_context(|| format!("decode {what}"))?)
}

// ── Google ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    #[serde(default)]
    verified_email: bool,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleProvider {
    pub http: reqwest::Client,
    pub config: OAuthClientConfig,
}

impl OAuthProvider for GoogleProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    fn authorize_url(&self, state: &str) -> String {
        authorize_url(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
            ],
        )
    }

    async fn exchange(&self, code: &str) -> Result<SocialProfile, AuthServiceError> {
        let res = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await
            .context("google token request")?;
        let token: AccessTokenResponse = read_json(res, "google token exchange").await?;

        let res = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("google userinfo request")?;
        let info: GoogleUserInfo = read_json(res, "google userinfo").await?;

        Ok(SocialProfile {
            // An unverified address proves nothing about ownership.
            email: info.email.filter(|_| info.verified_email),
            name: info.name,
            avatar: info.picture,
        })
    }
}

// ── Facebook ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FacebookPictureData {
    url: Option<String>,
}

#[derive(Deserialize)]
struct FacebookPicture {
    data: Option<FacebookPictureData>,
}

#[derive(Deserialize)]
struct FacebookMe {
    email: Option<String>,
    name: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Clone)]
pub struct FacebookProvider {
    pub http: reqwest::Client,
    pub config: OAuthClientConfig,
}

impl OAuthProvider for FacebookProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Facebook
    }

    fn authorize_url(&self, state: &str) -> String {
        authorize_url(
            FACEBOOK_AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "email public_profile"),
                ("state", state),
            ],
        )
    }

    async fn exchange(&self, code: &str) -> Result<SocialProfile, AuthServiceError> {
        let res = self
            .http
            .get(FACEBOOK_TOKEN_URL)
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await
            .context("facebook token request")?;
        let token: AccessTokenResponse = read_json(res, "facebook token exchange").await?;

        let res = self
            .http
            .get(FACEBOOK_ME_URL)
            .query(&[("fields", "id,name,email,picture.type(large)")])
            .bearer_auth(&token.access_token)
            .send()
            .await
            .context("facebook me request")?;
        let me: FacebookMe = read_json(res, "facebook profile").await?;

        Ok(SocialProfile {
            email: me.email,
            name: me.name,
            avatar: me.picture.and_then(|p| p.data).and_then(|d| d.url),
        })
    }
}
