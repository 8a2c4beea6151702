/// Credential Store
///
/// Lookup of principals and their stored password hashes. The auth core
/// only reads user records; creation happens in the registration route
/// through the same Postgres-backed type.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

/// The authenticated identity: stable numeric id plus username.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

/// A stored bcrypt hash.
///
/// Wrapped so it cannot leak through `Debug` output or be serialized into a
/// response by accident; comparison goes through `verify_password`, never
/// `==`.
#[derive(Clone)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash([redacted])")
    }
}

/// A principal together with the stored password hash.
#[derive(Debug, Clone)]
pub struct Credential {
    pub principal: Principal,
    pub password_hash: PasswordHash,
}

#[async_trait]
pub trait CredentialStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Credential>, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Principal>, AppError>;
}

/// Postgres-backed credential store over the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user and return the assigned principal.
    ///
    /// # Errors
    /// A taken username surfaces as a unique-constraint violation.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Principal, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(Principal {
            id,
            username: username.to_string(),
        })
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Credential>, AppError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash)| Credential {
            principal: Principal { id, username },
            password_hash: PasswordHash::new(password_hash),
        }))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Principal>, AppError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, username FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username)| Principal { id, username }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_debug_is_redacted() {
        let credential = Credential {
            principal: Principal {
                id: 1,
                username: "alice".to_string(),
            },
            password_hash: PasswordHash::new("$2b$12$abcdefghijk".to_string()),
        };

        let printed = format!("{:?}", credential);
        assert!(!printed.contains("$2b$12$abcdefghijk"));
        assert!(printed.contains("redacted"));
    }
}
