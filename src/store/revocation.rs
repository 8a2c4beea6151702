/// Refresh Token Revocation Store
///
/// Records the single currently-valid refresh token per principal, with a
/// TTL mirroring the token's own expiry. A later login overwrites the
/// record, which invalidates the earlier session's refresh token at
/// refresh-use time even though the JWT itself still verifies. Concurrent
/// logins race on the record and the last writer wins; that is the intended
/// single-active-refresh-token semantics, not something to lock around.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool as RedisPool};

use crate::error::AppError;

fn record_key(user_id: i64) -> String {
    format!("refresh_token:{}", user_id)
}

#[async_trait]
pub trait RevocationStore {
    /// Store the current refresh token for a principal, overwriting any
    /// previous record.
    async fn set(&self, user_id: i64, token: &str, ttl: Duration) -> Result<(), AppError>;

    /// Fetch the current refresh token for a principal, if any. Expired
    /// records behave as absent.
    async fn get(&self, user_id: i64) -> Result<Option<String>, AppError>;

    /// Drop the record, invalidating the principal's refresh token.
    async fn delete(&self, user_id: i64) -> Result<(), AppError>;
}

/// Redis-backed revocation store.
#[derive(Clone)]
pub struct RedisRevocationStore {
    pool: RedisPool,
}

impl RedisRevocationStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn set(&self, user_id: i64, token: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(record_key(user_id), token, ttl.as_secs())
            .await?;
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, AppError> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(record_key(user_id)).await?;
        Ok(value)
    }

    async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        let _: i32 = conn.del(record_key(user_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_is_scoped_per_principal() {
        assert_eq!(record_key(42), "refresh_token:42");
        assert_ne!(record_key(1), record_key(2));
    }
}
