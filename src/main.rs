use std::net::TcpListener;

use sqlx::postgres::PgPoolOptions;
use taskboard::auth::JwtKeys;
use taskboard::configuration::get_configuration;
use taskboard::startup::run;
use taskboard::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // Signing keys are loaded once; everything downstream borrows them.
    let keys = JwtKeys::from_settings(&configuration.jwt).map_err(|e| {
        tracing::error!("Failed to load JWT key material: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Key material error")
    })?;

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let redis_pool = deadpool_redis::Config::from_url(configuration.redis.url.expose_secret())
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| {
            tracing::error!("Failed to create redis pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Redis connection error",
            )
        })?;

    tracing::info!("Redis connection pool created successfully");

    let address = format!("127.0.0.1:{}", configuration.application.port);
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;

    let server = run(listener, pool, redis_pool, keys, configuration.jwt.clone())?;
    tracing::info!("Server started successfully");

    server.await
}
