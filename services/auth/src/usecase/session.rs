use smarttech_auth_types::token::JwtClaims;
use smarttech_domain::clock::Clock;
use smarttech_domain::user::UserStatus;

use crate::domain::repository::{TokenBlacklist, UserRepository};
use crate::domain::types::UserRecord;
use crate::error::AuthServiceError;
use crate::usecase::password::verify_password;
use crate::usecase::token::{CreateTokenPayload, TokenPair, TokenService};

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: UserRecord,
    pub tokens: TokenPair,
}

pub struct LoginUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    pub users: U,
    pub tokens: TokenService<B, C>,
}

impl<U, B, C> LoginUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    /// Unknown email, non-Active account and wrong password all fail the same way.
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::Unauthorized)?;

        if user.status != UserStatus::Active {
            return Err(AuthServiceError::Unauthorized);
        }
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::Unauthorized)?;
        if !verify_password(&input.password, hash)? {
            return Err(AuthServiceError::Unauthorized);
        }

        let tokens = self.tokens.create_token_pairs(CreateTokenPayload {
            sub: user.id,
            role: user.role,
        })?;

        tracing::info!(user_id = %user.id, "logged in");
        Ok(LoginOutput { user, tokens })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutInput {
    /// Claims of the already-authenticated access token.
    pub access: JwtClaims,
    /// Raw refresh token from the cookie, if the client still holds one.
    pub refresh_token: Option<String>,
}

pub struct LogoutUseCase<B: TokenBlacklist, C: Clock> {
    pub tokens: TokenService<B, C>,
}

impl<B: TokenBlacklist, C: Clock> LogoutUseCase<B, C> {
    pub async fn execute(&self, input: LogoutInput) -> Result<(), AuthServiceError> {
        self.tokens.revoke(&input.access).await?;

        // The refresh half is revoked only if it is still valid and belongs to the same user.
        if let Some(raw) = input.refresh_token.as_deref() {
            match self.tokens.verify_refresh_token(raw) {
                Ok(refresh) if refresh.sub == input.access.sub => {
                    self.tokens.revoke(&refresh).await?;
                }
                Ok(_) => tracing::warn!(sub = %input.access.sub, "refresh cookie for other user"),
                Err(AuthServiceError::Internal(e)) => return Err(AuthServiceError::Internal(e)),
                Err(_) => {}
            }
        }

        tracing::info!(sub = %input.access.sub, "logged out");
        Ok(())
    }
}
