//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod likes;
mod posts;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Malformed bodies and path segments answer in the same `{error}` shape.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".to_string()).into()),
    );
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            // Content routes; writes require a bearer token
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/like", web::post().to(likes::toggle_like))
                    .route("/{id}/comments", web::get().to(comments::list_comments))
                    .route("/{id}/comments", web::post().to(comments::add_comment))
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::delete().to(comments::delete_comment),
                    ),
            ),
    );
}
