use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};

use crate::domain::repository::{OtpCache, TokenBlacklist};
use crate::error::AuthServiceError;

fn otp_key(email: &str) -> String {
    format!("otp:{email}")
}

fn blacklist_key(sub: &str, jti: &str) -> String {
    format!("blacklist:{sub}:{jti}")
}

async fn connection(pool: &Pool) -> Result<deadpool_redis::Connection, AuthServiceError> {
    pool.get()
        .await
        .map_err(|e| AuthServiceError::Internal(e.into()))
}

// ── OTP cache ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisOtpCache {
    pub pool: Pool,
    pub ttl_secs: u64,
}

impl OtpCache for RedisOtpCache {
    async fn store(&self, email: &str, code: &str) -> Result<(), AuthServiceError> {
        let mut conn = connection(&self.pool).await?;
        let (): () = conn
            .set_ex(otp_key(email), code, self.ttl_secs)
            .await
            .map_err(|e: redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }

    async fn validate(&self, email: &str, code: &str) -> Result<bool, AuthServiceError> {
        let mut conn = connection(&self.pool).await?;
        let stored: Option<String> = conn
            .get(otp_key(email))
            .await
            .map_err(|e: redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(stored.is_some_and(|s| s == code))
    }

    async fn delete(&self, email: &str) -> Result<bool, AuthServiceError> {
        let mut conn = connection(&self.pool).await?;
        let removed: u64 = conn
            .del(otp_key(email))
            .await
            .map_err(|e: redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(removed > 0)
    }
}

// ── Token blacklist ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisTokenBlacklist {
    pub pool: Pool,
}

impl TokenBlacklist for RedisTokenBlacklist {
    async fn insert(&self, sub: &str, jti: &str, ttl_secs: u64) -> Result<bool, AuthServiceError> {
        let mut conn = connection(&self.pool).await?;
        // SET NX replies nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(blacklist_key(sub, jti))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        Ok(reply.is_some())
    }

    async fn contains(&self, sub: &str, jti: &str) -> Result<bool, AuthServiceError> {
        let mut conn = connection(&self.pool).await?;
        let exists: bool = conn
            .exists(blacklist_key(sub, jti))
            .await
            .map_err(|e: redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(exists)
    }
}
