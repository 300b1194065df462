use serde::Serialize;
use uuid::Uuid;

use smarttech_auth_types::token::{JwtClaims, decode_claims, encode_claims};
use smarttech_domain::clock::Clock;
use smarttech_domain::id::UserId;
use smarttech_domain::user::{UserRole, UserStatus};

use crate::domain::repository::{TokenBlacklist, UserRepository};
use crate::error::AuthServiceError;

/// Signing secrets and lifetimes for the two halves of a token pair.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access-token lifetime in seconds.
    pub access_ttl: u64,
    /// Refresh-token lifetime in seconds; also the refresh cookie Max-Age.
    pub refresh_ttl: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity embedded in every token of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTokenPayload {
    pub sub: UserId,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_exp: u64,
    pub refresh_token_exp: u64,
}

/// Sole authority for minting, verifying and revoking session tokens.
pub struct TokenService<B: TokenBlacklist, C: Clock> {
    pub blacklist: B,
    pub clock: C,
    pub settings: TokenSettings,
}

impl<B: TokenBlacklist, C: Clock> TokenService<B, C> {
    fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.settings.access_secret,
            TokenKind::Refresh => &self.settings.refresh_secret,
        }
    }

    fn sign(
        &self,
        payload: CreateTokenPayload,
        kind: TokenKind,
        now: u64,
    ) -> Result<(String, u64), AuthServiceError> {
        let ttl = match kind {
            TokenKind::Access => self.settings.access_ttl,
            TokenKind::Refresh => self.settings.refresh_ttl,
        };
        let claims = JwtClaims {
            sub: payload.sub.to_string(),
            role: payload.role,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl,
        };
        let token = encode_claims(&claims, self.secret(kind))
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        Ok((token, claims.exp))
    }

    /// Issue a fresh access/refresh pair. Each token gets its own `jti`.
    pub fn create_token_pairs(
        &self,
        payload: CreateTokenPayload,
    ) -> Result<TokenPair, AuthServiceError> {
        let now = self.clock.now_secs();
        let (access_token, access_token_exp) = self.sign(payload, TokenKind::Access, now)?;
        let (refresh_token, refresh_token_exp) = self.sign(payload, TokenKind::Refresh, now)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_token_exp,
            refresh_token_exp,
        })
    }

    /// Check signature, structure and expiry. The blacklist is not consulted.
    pub fn verify_token(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<JwtClaims, AuthServiceError> {
        let claims = decode_claims(token, self.secret(kind), self.clock.now_secs())?;
        claims.user_id()?;
        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<JwtClaims, AuthServiceError> {
        self.verify_token(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<JwtClaims, AuthServiceError> {
        self.verify_token(token, TokenKind::Refresh)
    }

    pub async fn set_token_to_blacklist(
        &self,
        sub: &str,
        jti: &str,
        expires_in_secs: u64,
    ) -> Result<(), AuthServiceError> {
        // A zero-lifetime token is already dead; a zero TTL would also be rejected by Redis.
        if expires_in_secs == 0 {
            return Ok(());
        }
        self.blacklist.insert(sub, jti, expires_in_secs).await?;
        Ok(())
    }

    /// Blacklist a verified token for exactly its remaining lifetime.
    pub async fn revoke(&self, claims: &JwtClaims) -> Result<(), AuthServiceError> {
        let remaining = claims.remaining_secs(self.clock.now_secs());
        self.set_token_to_blacklist(&claims.sub, &claims.jti, remaining)
            .await
    }

    pub async fn is_token_blacklisted(
        &self,
        sub: &str,
        jti: &str,
    ) -> Result<bool, AuthServiceError> {
        self.blacklist.contains(sub, jti).await
    }

    /// Verify an access token and reject it if revoked.
    ///
    /// Only `TokenExpired` survives as a distinct kind; every other rejection is
    /// `Unauthorized`.
    pub async fn authenticate(&self, access_token: &str) -> Result<JwtClaims, AuthServiceError> {
        let claims = self
            .verify_access_token(access_token)
            .map_err(|e| match e {
                AuthServiceError::InvalidToken => AuthServiceError::Unauthorized,
                other => other,
            })?;
        if self.is_token_blacklisted(&claims.sub, &claims.jti).await? {
            return Err(AuthServiceError::Unauthorized);
        }
        Ok(claims)
    }

    /// Consume `current_refresh_token`: verify it and claim its `jti` on the blacklist.
    ///
    /// A second call with the same token (replay, or a concurrent refresh) fails
    /// `Unauthorized`.
    pub async fn consume_refresh_token(
        &self,
        current_refresh_token: &str,
    ) -> Result<JwtClaims, AuthServiceError> {
        let claims = self
            .verify_refresh_token(current_refresh_token)
            .map_err(|e| match e {
                AuthServiceError::Internal(_) => e,
                _ => AuthServiceError::Unauthorized,
            })?;

        if self.is_token_blacklisted(&claims.sub, &claims.jti).await? {
            tracing::warn!(sub = %claims.sub, "revoked refresh token presented");
            return Err(AuthServiceError::Unauthorized);
        }
        // Claim the jti atomically; a concurrent rotation of the same token loses here.
        let remaining = claims.remaining_secs(self.clock.now_secs()).max(1);
        if !self.blacklist.insert(&claims.sub, &claims.jti, remaining).await? {
            tracing::warn!(sub = %claims.sub, "concurrent refresh token rotation rejected");
            return Err(AuthServiceError::Unauthorized);
        }
        Ok(claims)
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    pub users: U,
    pub tokens: TokenService<B, C>,
}

impl<U, B, C> RefreshTokenUseCase<U, B, C>
where
    U: UserRepository,
    B: TokenBlacklist,
    C: Clock,
{
    /// Rotate: consume the refresh token and issue a brand-new pair.
    ///
    /// The account is re-read, so a Disabled or deleted user cannot keep rotating and
    /// the new pair carries the current role.
    pub async fn execute(
        &self,
        current_refresh_token: &str,
    ) -> Result<TokenPair, AuthServiceError> {
        let claims = self.tokens.consume_refresh_token(current_refresh_token).await?;
        let sub = claims.user_id().map_err(|_| AuthServiceError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(sub)
            .await?
            .ok_or(AuthServiceError::Unauthorized)?;
        if user.status != UserStatus::Active {
            tracing::warn!(user_id = %sub, status = ?user.status, "refresh for inactive account");
            return Err(AuthServiceError::Unauthorized);
        }

        let pair = self.tokens.create_token_pairs(CreateTokenPayload {
            sub: user.id,
            role: user.role,
        })?;
        tracing::info!(user_id = %sub, "refresh token rotated");
        Ok(pair)
    }
}
