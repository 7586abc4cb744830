//! HTTP handlers and route configuration.

mod auth;
mod health;
mod multipart;
mod posts;
mod users;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // Public routes
    .route("/health", web::get().to(health::health_check))
    .route("/register", web::post().to(auth::register))
    .route("/login", web::post().to(auth::login))
    .route("/logout", web::post().to(auth::logout))
    .route("/user/{id}", web::get().to(users::author_posts))
    // Session required
    .route("/profile", web::get().to(auth::profile))
    .service(
        web::resource("/post")
            .route(web::get().to(posts::list))
            .route(web::post().to(posts::create))
            .route(web::put().to(posts::update)),
    )
    .service(
        web::resource("/post/{id}")
            .route(web::get().to(posts::get))
            .route(web::delete().to(posts::delete)),
    );
}
