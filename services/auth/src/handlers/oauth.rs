use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use smarttech_auth_types::cookie::{
    OAUTH_STATE_COOKIE, clear_oauth_state_cookie, set_oauth_state_cookie,
    set_refresh_token_cookie,
};

use crate::domain::repository::OAuthProvider;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::social::{SocialLoginInput, SocialLoginUseCase};

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declines consent.
    pub error: Option<String>,
}

fn start<P: OAuthProvider>(
    state: &AppState,
    provider: &P,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let nonce = Uuid::new_v4().simple().to_string();
    let url = provider.authorize_url(&nonce);
    let jar = set_oauth_state_cookie(jar, nonce, state.cookie_domain.clone());
    (jar, Redirect::to(&url))
}

async fn finish<P: OAuthProvider>(
    state: &AppState,
    provider: &P,
    jar: CookieJar,
    query: OAuthCallbackQuery,
) -> Result<(CookieJar, Redirect), AuthServiceError> {
    if let Some(error) = query.error.as_deref() {
        tracing::info!(provider = provider.provider().as_str(), error, "oauth consent denied");
        return Err(AuthServiceError::Unauthorized);
    }
    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_owned());
    match (expected.as_deref(), query.state.as_deref()) {
        (Some(expected), Some(got)) if !expected.is_empty() && expected == got => {}
        _ => return Err(AuthServiceError::Unauthorized),
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AuthServiceError::Validation("code: is required".to_owned()))?;

    let profile = provider.exchange(&code).await?;
    let usecase = SocialLoginUseCase {
        users: state.user_repo(),
        tokens: state.token_service(),
    };
    let out = usecase
        .execute(SocialLoginInput {
            provider: provider.provider(),
            profile,
        })
        .await?;

    let jar = clear_oauth_state_cookie(jar, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(
        jar,
        out.tokens.refresh_token,
        state.cookie_domain.clone(),
        state.tokens.refresh_ttl,
    );
    let target = format!(
        "{}/auth-success#token={}",
        state.frontend_redirect_url, out.tokens.access_token
    );
    Ok((jar, Redirect::to(&target)))
}

// ── GET /auth/google, GET /auth/google/redirect ──────────────────────────────

pub async fn google_login(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    start(&state, &state.google, jar)
}

pub async fn google_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, AuthServiceError> {
    finish(&state, &state.google, jar, query).await
}

// ── GET /auth/facebook, GET /auth/facebook/redirect ──────────────────────────

pub async fn facebook_login(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    start(&state, &state.facebook, jar)
}

pub async fn facebook_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, AuthServiceError> {
    finish(&state, &state.facebook, jar, query).await
}
