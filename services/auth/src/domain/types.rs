use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smarttech_domain::id::UserId;
use smarttech_domain::user::{AuthProvider, UserRole, UserStatus};

/// Credential-store view of a user.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string; `None` until the password-creation step.
    pub password_hash: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub provider: AuthProvider,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Email proven by OTP, password not yet chosen.
    pub fn is_awaiting_password(&self) -> bool {
        self.status == UserStatus::Pending
            && self.email_verified_at.is_some()
            && self.password_hash.is_none()
    }
}

/// Fields for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub provider: AuthProvider,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl NewUser {
    /// First registration request for a local account.
    pub fn pending(email: &str) -> Self {
        Self {
            email: email.to_owned(),
            status: UserStatus::Pending,
            role: UserRole::User,
            provider: AuthProvider::Local,
            name: None,
            avatar: None,
        }
    }
}

/// Identity asserted by an OAuth provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// Facebook accounts registered by phone number have no email.
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Registration / reset OTP length in decimal digits.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds.
pub const DEFAULT_OTP_TTL_SECS: u64 = 300;

/// Length of the system-generated password sent on reset.
pub const TEMP_PASSWORD_LEN: usize = 10;
