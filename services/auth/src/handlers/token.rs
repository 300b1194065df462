use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use smarttech_auth_types::cookie::{REFRESH_TOKEN_COOKIE, set_refresh_token_cookie};
use smarttech_domain::user::UserRole;

use crate::error::AuthServiceError;
use crate::handlers::extract::AuthenticatedUser;
use crate::state::AppState;
use crate::usecase::token::RefreshTokenUseCase;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub access_token_exp: u64,
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTokenResponse {
    pub user_id: String,
    pub role: UserRole,
    pub access_token_exp: u64,
}

pub async fn check_token(AuthenticatedUser(claims): AuthenticatedUser) -> Json<CheckTokenResponse> {
    Json(CheckTokenResponse {
        user_id: claims.sub,
        role: claims.role,
        access_token_exp: claims.exp,
    })
}

// ── POST /auth/refresh ────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let current = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(AuthServiceError::Unauthorized)?;

    let pair = RefreshTokenUseCase {
        users: state.user_repo(),
        tokens: state.token_service(),
    }
    .execute(&current)
    .await?;

    let jar = set_refresh_token_cookie(
        jar,
        pair.refresh_token,
        state.cookie_domain.clone(),
        state.tokens.refresh_ttl,
    );
    let body = AccessTokenResponse {
        access_token: pair.access_token,
        access_token_exp: pair.access_token_exp,
    };
    Ok((jar, Json(body)))
}
