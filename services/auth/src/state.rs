use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use smarttech_domain::clock::SystemClock;

use crate::infra::cache::{RedisOtpCache, RedisTokenBlacklist};
use crate::infra::db::{DbUserRepository, OutboxMailQueue};
use crate::infra::oauth::{FacebookProvider, GoogleProvider};
use crate::usecase::token::{TokenService, TokenSettings};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub tokens: TokenSettings,
    pub otp_ttl_secs: u64,
    pub cookie_domain: String,
    /// No trailing slash.
    pub frontend_redirect_url: String,
    pub google: GoogleProvider,
    pub facebook: FacebookProvider,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn mail_queue(&self) -> OutboxMailQueue {
        OutboxMailQueue {
            db: self.db.clone(),
        }
    }

    pub fn otp_cache(&self) -> RedisOtpCache {
        RedisOtpCache {
            pool: self.redis.clone(),
            ttl_secs: self.otp_ttl_secs,
        }
    }

    pub fn blacklist(&self) -> RedisTokenBlacklist {
        RedisTokenBlacklist {
            pool: self.redis.clone(),
        }
    }

    pub fn token_service(&self) -> TokenService<RedisTokenBlacklist, SystemClock> {
        TokenService {
            blacklist: self.blacklist(),
            clock: SystemClock,
            settings: self.tokens.clone(),
        }
    }
}
