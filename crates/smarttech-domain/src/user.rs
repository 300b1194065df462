//! User domain types.

use serde::{Deserialize, Serialize};

/// Error returned when a stored wire value does not map to a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: u8,
}

/// User permission level.
///
/// Wire format in JWT claims: `"USER"` / `"ADMIN"`. Storage format: `u8` (0 = User, 1 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User = 0,
    Admin = 1,
}

impl UserRole {
    pub fn from_u8(v: u8) -> Result<Self, UnknownVariant> {
        match v {
            0 => Ok(Self::User),
            1 => Ok(Self::Admin),
            value => Err(UnknownVariant { kind: "role", value }),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Account lifecycle state.
///
/// `Pending` accounts exist from the first registration request until a password is
/// created. Only `Active` accounts may log in with local credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending = 0,
    Active = 1,
    Disabled = 2,
}

impl UserStatus {
    pub fn from_u8(v: u8) -> Result<Self, UnknownVariant> {
        match v {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Active),
            2 => Ok(Self::Disabled),
            value => Err(UnknownVariant {
                kind: "status",
                value,
            }),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Where an account's identity was first proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Local,
    Google,
    Facebook,
}

impl AuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Google => "GOOGLE",
            Self::Facebook => "FACEBOOK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOCAL" => Some(Self::Local),
            "GOOGLE" => Some(Self::Google),
            "FACEBOOK" => Some(Self::Facebook),
            _ => None,
        }
    }
}
