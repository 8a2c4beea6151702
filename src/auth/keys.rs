/// JWT Key Material
///
/// Loads the RSA key pair used for signing and verifying tokens. The pair is
/// read once at process start and passed by reference into the codec; no
/// call site reads key files on its own.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::configuration::JwtSettings;
use crate::error::{AppError, ConfigError};

/// Signing and verification keys plus the pinned algorithm.
///
/// Deliberately does not implement `Debug`: key material must never leak
/// through logging frameworks that recursively print struct fields.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub algorithm: Algorithm,
}

impl JwtKeys {
    /// Load the key pair from the PEM files named in configuration.
    ///
    /// # Errors
    /// Returns error if a key file cannot be read, a PEM is malformed, or
    /// the configured algorithm is not from the RSA family.
    pub fn from_settings(settings: &JwtSettings) -> Result<Self, AppError> {
        let private_pem = std::fs::read(&settings.private_key_path).map_err(|e| {
            AppError::Config(ConfigError::MissingRequired(format!(
                "jwt.private_key_path ({}): {}",
                settings.private_key_path, e
            )))
        })?;
        let public_pem = std::fs::read(&settings.public_key_path).map_err(|e| {
            AppError::Config(ConfigError::MissingRequired(format!(
                "jwt.public_key_path ({}): {}",
                settings.public_key_path, e
            )))
        })?;

        let algorithm = Algorithm::from_str(&settings.algorithm).map_err(|_| {
            AppError::Config(ConfigError::InvalidValue(format!(
                "jwt.algorithm '{}' is not a known algorithm",
                settings.algorithm
            )))
        })?;

        Self::from_pem(&private_pem, &public_pem, algorithm)
    }

    /// Build keys from in-memory PEM data.
    pub fn from_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        algorithm: Algorithm,
    ) -> Result<Self, AppError> {
        // Symmetric algorithms would let any verifier forge tokens; only the
        // RSA family is accepted.
        if !matches!(
            algorithm,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512
        ) {
            return Err(AppError::Config(ConfigError::InvalidValue(
                "jwt.algorithm must be an RSA algorithm (RS256/RS384/RS512)".to_string(),
            )));
        }

        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|_| {
            AppError::Config(ConfigError::InvalidValue(
                "private key is not a valid RSA PEM".to_string(),
            ))
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|_| {
            AppError::Config(ConfigError::InvalidValue(
                "public key is not a valid RSA PEM".to_string(),
            ))
        })?;

        Ok(Self {
            encoding,
            decoding,
            algorithm,
        })
    }
}
