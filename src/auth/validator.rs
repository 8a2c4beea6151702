/// Token Validation and Credential Verification
///
/// `validate_token` runs the presented token through a fixed sequence:
/// decode, discriminant check, revocation check (refresh only), principal
/// lookup. It is a single function parameterized by the expected token type
/// rather than a per-type validator object, so there is no hidden instance
/// state.
///
/// Access tokens deliberately skip the revocation lookup: they are
/// stateless by design, trading instant revocability for zero store
/// round trips on the hot path. The exposure window of a leaked access
/// token is bounded by its short expiry.

use crate::auth::claims::TokenType;
use crate::auth::jwt::decode_token;
use crate::auth::keys::JwtKeys;
use crate::auth::password::verify_password;
use crate::error::{AppError, AuthError};
use crate::store::{CredentialStore, Principal, RevocationStore};

/// Verify a username/password pair against the credential store.
///
/// # Errors
/// An unknown username and a wrong password both yield
/// `InvalidCredentials`; the caller cannot tell which occurred.
pub async fn authenticate<C>(
    username: &str,
    password: &str,
    credentials: &C,
) -> Result<Principal, AppError>
where
    C: CredentialStore + Sync,
{
    let credential = credentials
        .get_by_username(username)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    match verify_password(password, credential.password_hash.expose()) {
        Ok(true) => Ok(credential.principal),
        Ok(false) => Err(AppError::Auth(AuthError::InvalidCredentials)),
        Err(_) => {
            // A corrupt stored hash is a server-side defect, but the login
            // response must not reveal anything beyond a failed attempt.
            tracing::error!(
                user_id = credential.principal.id,
                "Stored password hash is malformed"
            );
            Err(AppError::Auth(AuthError::InvalidCredentials))
        }
    }
}

/// Validate a presented token and resolve its principal.
///
/// # Errors
/// - `InvalidToken`: bad signature, expired, wrong algorithm, malformed
/// - `WrongTokenType`: discriminant does not match `expected`
/// - `RevokedOrExpired`: refresh token absent from or superseded in the
///   revocation store
/// - `UnknownPrincipal`: token subject no longer exists
pub async fn validate_token<C, R>(
    token: &str,
    expected: TokenType,
    keys: &JwtKeys,
    credentials: &C,
    revocations: &R,
) -> Result<Principal, AppError>
where
    C: CredentialStore + Sync,
    R: RevocationStore + Sync,
{
    let claims = decode_token(token, keys)?;

    if claims.token_type != expected {
        return Err(AppError::Auth(AuthError::WrongTokenType {
            found: claims.token_type,
            expected,
        }));
    }

    if expected == TokenType::Refresh {
        // The stored record is authoritative: only the most recently issued
        // refresh token for this principal is accepted.
        match revocations.get(claims.sub).await? {
            Some(stored) if stored == token => {}
            _ => {
                tracing::warn!(user_id = claims.sub, "Refresh token is not current");
                return Err(AppError::Auth(AuthError::RevokedOrExpired));
            }
        }
    }

    credentials
        .get_by_id(claims.sub)
        .await?
        .ok_or(AppError::Auth(AuthError::UnknownPrincipal))
}
