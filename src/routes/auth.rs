/// Authentication Routes
///
/// User registration, login, token refresh, and current user information.

use std::time::Duration;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{
    authenticate, hash_password, issue_access_token, issue_token_pair, validate_token, JwtKeys,
    TokenType,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::store::{PgCredentialStore, Principal, RedisRevocationStore, RevocationStore};

const MAX_USERNAME_LENGTH: usize = 64;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token response; the refresh token is present only at login.
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "username".to_string(),
        )));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        )));
    }
    Ok(())
}

/// POST /api/v1/auth/register
///
/// Register a new user with username and password.
///
/// # Errors
/// - 400: Validation errors (empty/overlong username, password bounds)
/// - 409: Username already taken
pub async fn register(
    form: web::Json<RegisterRequest>,
    credentials: web::Data<PgCredentialStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    validate_username(&form.username)?;
    let password_hash = hash_password(&form.password)?;

    let principal = credentials
        .create_user(&form.username, &password_hash)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = principal.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(MessageResponse {
        message: format!("Hello, {}!", principal.username),
    }))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username and password; returns an access/refresh token
/// pair. The refresh token is recorded in the revocation store with a TTL
/// matching its expiry, overwriting any token from a previous login.
///
/// # Errors
/// - 401: Invalid credentials (unknown username and wrong password are
///   indistinguishable)
/// - 503: Credential or revocation store unavailable
pub async fn login(
    form: web::Json<LoginRequest>,
    credentials: web::Data<PgCredentialStore>,
    revocations: web::Data<RedisRevocationStore>,
    keys: web::Data<JwtKeys>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let principal = authenticate(&form.username, &form.password, credentials.get_ref()).await?;

    let pair = issue_token_pair(&principal, keys.get_ref(), jwt_settings.get_ref())?;

    let ttl = Duration::from_secs(
        jwt_settings.refresh_token_expire_days.unsigned_abs() * 24 * 60 * 60,
    );
    revocations
        .set(principal.id, &pair.refresh_token, ttl)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = principal.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: Some(pair.refresh_token),
        token_type: "Bearer".to_string(),
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access token. The presented
/// token must be the one currently recorded for the principal; a token
/// superseded by a later login is rejected even though its signature still
/// verifies.
///
/// # Errors
/// - 401: Invalid, expired, wrong-type, or superseded refresh token
/// - 503: Credential or revocation store unavailable
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    credentials: web::Data<PgCredentialStore>,
    revocations: web::Data<RedisRevocationStore>,
    keys: web::Data<JwtKeys>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let principal = validate_token(
        &form.refresh_token,
        TokenType::Refresh,
        keys.get_ref(),
        credentials.get_ref(),
        revocations.get_ref(),
    )
    .await?;

    let access_token = issue_access_token(&principal, keys.get_ref(), jwt_settings.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = principal.id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: None,
        token_type: "Bearer".to_string(),
    }))
}

/// GET /api/v1/auth/me
///
/// Current authenticated user; the principal is injected by the JWT
/// middleware.
pub async fn current_user(principal: web::ReqData<Principal>) -> HttpResponse {
    HttpResponse::Ok().json(principal.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_username_is_rejected() {
        assert!(validate_username("   ").is_err());
    }

    #[test]
    fn overlong_username_is_rejected() {
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn reasonable_username_is_accepted() {
        assert!(validate_username("alice").is_ok());
    }

    #[test]
    fn refresh_response_omits_refresh_token() {
        let response = TokenResponse {
            access_token: "a.b.c".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["token_type"], "Bearer");
    }
}
