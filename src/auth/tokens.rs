/// Token Issuance
///
/// Builds access and refresh tokens for an authenticated principal. The
/// issuer is side-effect-free: the caller persists the refresh token into
/// the revocation store with a TTL matching its expiry window.

use chrono::Duration;

use crate::auth::claims::{Claims, TokenType};
use crate::auth::jwt::encode_token;
use crate::auth::keys::JwtKeys;
use crate::configuration::JwtSettings;
use crate::error::AppError;
use crate::store::Principal;

/// An access/refresh token pair issued at login.
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue a short-lived access token.
///
/// The minutes-scale window bounds the blast radius of a leaked access
/// token, since access tokens are validated statelessly and cannot be
/// revoked before their natural expiry.
pub fn issue_access_token(
    principal: &Principal,
    keys: &JwtKeys,
    settings: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        principal.id,
        principal.username.clone(),
        TokenType::Access,
        Duration::minutes(settings.access_token_expire_minutes),
    );
    encode_token(&claims, keys)
}

/// Issue a long-lived refresh token.
pub fn issue_refresh_token(
    principal: &Principal,
    keys: &JwtKeys,
    settings: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        principal.id,
        principal.username.clone(),
        TokenType::Refresh,
        Duration::days(settings.refresh_token_expire_days),
    );
    encode_token(&claims, keys)
}

/// Issue both tokens for a fresh login.
pub fn issue_token_pair(
    principal: &Principal,
    keys: &JwtKeys,
    settings: &JwtSettings,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: issue_access_token(principal, keys, settings)?,
        refresh_token: issue_refresh_token(principal, keys, settings)?,
    })
}
