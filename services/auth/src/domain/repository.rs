#![allow(async_fn_in_trait)]

use smarttech_domain::id::UserId;
use smarttech_domain::user::AuthProvider;

use crate::domain::types::{NewUser, SocialProfile, UserRecord};
use crate::error::AuthServiceError;

/// Credential store.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, AuthServiceError>;

    async fn create(&self, user: &NewUser) -> Result<UserRecord, AuthServiceError>;

    /// Record that the owner proved control of the email (sets `email_verified_at = now`).
    async fn mark_email_verified(&self, id: UserId) -> Result<(), AuthServiceError>;

    /// Store the first password hash and set status `Active` in one write.
    async fn activate_with_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), AuthServiceError>;

    /// Set status `Active` without touching the password (provider-verified accounts).
    async fn activate(&self, id: UserId) -> Result<(), AuthServiceError>;

    async fn update_password(&self, id: UserId, password_hash: &str)
    -> Result<(), AuthServiceError>;
}

/// Short-lived email → code store. Expiry is owned by the backing store's TTL;
/// an absent entry means expired or never issued.
pub trait OtpCache: Send + Sync {
    /// Overwrite any existing code for `email`; the TTL restarts.
    async fn store(&self, email: &str, code: &str) -> Result<(), AuthServiceError>;

    /// `true` iff a code is stored for `email` and equals `code` exactly.
    async fn validate(&self, email: &str, code: &str) -> Result<bool, AuthServiceError>;

    /// Remove the entry. Returns `true` only for the caller that actually removed it,
    /// so exactly one of several concurrent consumers wins.
    async fn delete(&self, email: &str) -> Result<bool, AuthServiceError>;
}

/// Revoked `(sub, jti)` pairs, each kept only until the token would have expired.
pub trait TokenBlacklist: Send + Sync {
    /// Add the pair with a TTL. Returns `false` if it was already present (no overwrite).
    async fn insert(&self, sub: &str, jti: &str, ttl_secs: u64) -> Result<bool, AuthServiceError>;

    async fn contains(&self, sub: &str, jti: &str) -> Result<bool, AuthServiceError>;
}

/// Enqueue side of the asynchronous mail worker. Delivery is not awaited.
pub trait MailQueue: Send + Sync {
    async fn send_otp_code(&self, user: &UserRecord, otp_code: &str)
    -> Result<(), AuthServiceError>;

    async fn send_new_password(
        &self,
        user: &UserRecord,
        new_password: &str,
    ) -> Result<(), AuthServiceError>;
}

/// Third-party identity provider speaking the OAuth 2 authorization-code grant.
pub trait OAuthProvider: Send + Sync {
    fn provider(&self) -> AuthProvider;

    /// Where to send the browser, carrying the CSRF `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade the authorization `code` for the user's profile.
    async fn exchange(&self, code: &str) -> Result<SocialProfile, AuthServiceError>;
}
