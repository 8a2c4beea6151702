/// JWT Claims structure
///
/// Represents the payload of a JWT token: the principal's identity plus the
/// standard expiry claims (RFC 7519) and the access/refresh discriminant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant distinguishing access tokens from refresh tokens.
///
/// Carried in the token payload under the `type` claim so that a token
/// issued for one use cannot be presented for the other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims for access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i64,
    /// Username at issuance time
    pub username: String,
    /// Token type discriminant
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp), always computed server-side
    pub exp: i64,
}

impl Claims {
    /// Create new claims valid for the given window from now.
    pub fn new(
        sub: i64,
        username: String,
        token_type: TokenType,
        valid_for: chrono::Duration,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub,
            username,
            token_type,
            iat: now,
            exp: now + valid_for.num_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_creation() {
        let claims = Claims::new(
            42,
            "alice".to_string(),
            TokenType::Access,
            chrono::Duration::minutes(15),
        );

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn negative_window_puts_exp_before_iat() {
        let claims = Claims::new(
            42,
            "alice".to_string(),
            TokenType::Access,
            chrono::Duration::minutes(-5),
        );

        assert_eq!(claims.iat - claims.exp, 5 * 60);
    }

    #[test]
    fn discriminant_serializes_as_type_field() {
        let claims = Claims::new(
            7,
            "bob".to_string(),
            TokenType::Refresh,
            chrono::Duration::days(30),
        );

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
        assert_eq!(json["sub"], 7);
    }
}
