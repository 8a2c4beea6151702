use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_web::dev::Server;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::JwtKeys;
use crate::configuration::JwtSettings;
use crate::middleware::JwtMiddleware;
use crate::routes::{
    create_task, current_user, delete_task, health_check, list_tasks, login, refresh, register,
    update_task,
};
use crate::store::{PgCredentialStore, RedisRevocationStore};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    redis_pool: deadpool_redis::Pool,
    keys: JwtKeys,
    jwt_settings: JwtSettings,
) -> Result<Server, std::io::Error> {
    let credentials = PgCredentialStore::new(connection.clone());
    let revocations = RedisRevocationStore::new(redis_pool);

    let connection = web::Data::new(connection);
    let credentials_data = web::Data::new(credentials.clone());
    let revocations_data = web::Data::new(revocations.clone());
    let keys_data = web::Data::new(keys.clone());
    let jwt_settings_data = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        let auth_guard =
            JwtMiddleware::new(keys.clone(), credentials.clone(), revocations.clone());

        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(connection.clone())
            .app_data(credentials_data.clone())
            .app_data(revocations_data.clone())
            .app_data(keys_data.clone())
            .app_data(jwt_settings_data.clone())

            .route("/health_check", web::get().to(health_check))

            .service(
                web::scope("/api/v1")
                    // Public authentication routes
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login))
                            .route("/refresh", web::post().to(refresh))
                            .service(
                                web::resource("/me")
                                    .wrap(auth_guard.clone())
                                    .route(web::get().to(current_user)),
                            ),
                    )
                    // Protected task routes (require access token)
                    .service(
                        web::scope("/tasks")
                            .wrap(auth_guard)
                            .route("", web::post().to(create_task))
                            .route("", web::get().to(list_tasks))
                            .route("/{id}", web::put().to(update_task))
                            .route("/{id}", web::delete().to(delete_task)),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
