use std::fmt;

use config::ConfigError;

/// A string that must never leak through logging or debug formatting.
/// Holds passwords and other credentials loaded from configuration.
#[derive(Clone, serde::Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([redacted])")
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> SecretString {
        SecretString::new(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name
        ))
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct RedisSettings {
    pub url: SecretString,
}

/// JWT authentication settings.
///
/// The key pair is asymmetric: the private key signs tokens, the public key
/// verifies them, so components that only validate tokens never need to hold
/// signing material. Both keys are loaded once at process start from the
/// configured PEM files.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub private_key_path: String,
    pub public_key_path: String,
    pub algorithm: String, // e.g. "RS256"
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_string_debug_is_redacted() {
        let secret = SecretString::new("hunter2".to_string());
        let printed = format!("{:?}", secret);

        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn connection_string_contains_database_name() {
        let settings = DatabaseSettings {
            username: "postgres".to_string(),
            password: SecretString::new("password".to_string()),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "taskboard".to_string(),
        };

        assert!(settings
            .connection_string()
            .expose_secret()
            .ends_with("/taskboard"));
    }
}
