/// JWT Token Codec
///
/// Signs and verifies tokens in compact serialization (three dot-separated
/// base64url segments). Verification pins the configured algorithm, so a
/// token whose header claims a different algorithm is rejected before any
/// signature check (algorithm confusion defense), and the expiry claim is
/// enforced alongside the signature.

use jsonwebtoken::{decode, encode, Header, Validation};

use crate::auth::claims::Claims;
use crate::auth::keys::JwtKeys;
use crate::error::{AppError, AuthError};

/// Sign claims into a compact JWT string.
///
/// # Errors
/// Returns error if signing fails.
pub fn encode_token(claims: &Claims, keys: &JwtKeys) -> Result<String, AppError> {
    encode(&Header::new(keys.algorithm), claims, &keys.encoding).map_err(|e| {
        tracing::error!(error = %e, "Token signing failed");
        AppError::Internal("Token generation failed".to_string())
    })
}

/// Verify a presented token and extract its claims.
///
/// # Errors
/// Returns `InvalidToken` when the signature does not verify, the token has
/// expired, the header algorithm does not match the configured one, or the
/// payload is not well-formed claims. The token string itself is never
/// logged.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<Claims, AppError> {
    let mut validation = Validation::new(keys.algorithm);
    // No clock leeway; jsonwebtoken defaults to 60 seconds, which would keep
    // an already-expired token alive for up to a minute.
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &keys.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AppError::Auth(AuthError::InvalidToken)
        })?;

    // jsonwebtoken's expiry check is strict less-than, so a token with
    // `exp == now` would still pass. The expiry second itself counts as
    // expired, which makes a zero-width validity window unusable.
    if claims.exp <= chrono::Utc::now().timestamp() {
        tracing::warn!("Token validation failed: token has expired");
        return Err(AppError::Auth(AuthError::InvalidToken));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::TokenType;
    use jsonwebtoken::{Algorithm, EncodingKey};

    const PRIVATE_PEM: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/certs/jwt-private.pem"
    ));
    const PUBLIC_PEM: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/certs/jwt-public.pem"
    ));

    fn test_keys() -> JwtKeys {
        JwtKeys::from_pem(
            PRIVATE_PEM.as_bytes(),
            PUBLIC_PEM.as_bytes(),
            Algorithm::RS256,
        )
        .expect("Failed to build test keys")
    }

    fn test_claims(valid_for: chrono::Duration) -> Claims {
        Claims::new(1, "alice".to_string(), TokenType::Access, valid_for)
    }

    #[test]
    fn encode_and_decode_round_trip() {
        let keys = test_keys();
        let claims = test_claims(chrono::Duration::minutes(15));

        let token = encode_token(&claims, &keys).expect("Failed to encode token");
        let decoded = decode_token(&token, &keys).expect("Failed to decode token");

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, claims.username);
        assert_eq!(decoded.token_type, TokenType::Access);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn token_has_three_segments() {
        let keys = test_keys();
        let token = encode_token(&test_claims(chrono::Duration::minutes(15)), &keys)
            .expect("Failed to encode token");

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = test_keys();
        let claims = test_claims(chrono::Duration::minutes(-10));
        let token = encode_token(&claims, &keys).expect("Failed to encode token");

        let result = decode_token(&token, &keys);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn recently_expired_token_is_rejected() {
        let keys = test_keys();
        // 30 seconds in the past falls inside jsonwebtoken's default leeway;
        // the codec disables it, so this must still be rejected.
        let claims = test_claims(chrono::Duration::seconds(-30));
        let token = encode_token(&claims, &keys).expect("Failed to encode token");

        let result = decode_token(&token, &keys);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn zero_window_token_is_rejected() {
        let keys = test_keys();
        // `exp == iat == now`: expired the moment it exists.
        let claims = test_claims(chrono::Duration::zero());
        let token = encode_token(&claims, &keys).expect("Failed to encode token");

        let result = decode_token(&token, &keys);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn tampering_any_segment_is_rejected() {
        let keys = test_keys();
        let token = encode_token(&test_claims(chrono::Duration::minutes(15)), &keys)
            .expect("Failed to encode token");

        let segments: Vec<&str> = token.split('.').collect();
        for i in 0..3 {
            let mut tampered = segments.clone();
            let flipped: String = {
                let mut chars: Vec<char> = segments[i].chars().collect();
                chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
                chars.into_iter().collect()
            };
            tampered[i] = &flipped;

            let result = decode_token(&tampered.join("."), &keys);
            assert!(
                matches!(result, Err(AppError::Auth(AuthError::InvalidToken))),
                "tampered segment {} was accepted",
                i
            );
        }
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = test_keys();
        let result = decode_token("not.a.token", &keys);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }

    #[test]
    fn hs256_token_signed_with_public_key_is_rejected() {
        // Classic algorithm-confusion attack: sign with HS256 using the
        // public key bytes as the shared secret. The pinned RS256 algorithm
        // must reject it at the header check.
        let keys = test_keys();
        let claims = test_claims(chrono::Duration::minutes(15));

        let forged = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(PUBLIC_PEM.as_bytes()),
        )
        .expect("Failed to forge token");

        let result = decode_token(&forged, &keys);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidToken))
        ));
    }
}
