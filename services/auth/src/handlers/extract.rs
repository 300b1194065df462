use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use smarttech_auth_types::bearer::BearerToken;
use smarttech_auth_types::token::JwtClaims;

use crate::error::AuthServiceError;
use crate::state::AppState;

/// Claims of a valid, unrevoked access token from `Authorization: Bearer`.
///
/// Expired tokens reject with `TOKEN_EXPIRED` so clients know to refresh; every other
/// failure is `UNAUTHORIZED`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub JwtClaims);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthServiceError;

    // Same shape as `BearerToken`: read the header now, verify in a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let bearer = BearerToken::from_parts(parts);
        let tokens = state.token_service();
        async move {
            let BearerToken(token) = bearer.ok_or(AuthServiceError::Unauthorized)?;
            let claims = tokens.authenticate(&token).await?;
            Ok(Self(claims))
        }
    }
}
