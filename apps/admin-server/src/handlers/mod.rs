//! HTTP handlers and route configuration.

mod health;
mod media;
mod posts;


use actix_web::{error::JsonPayloadError, web};

use crate::middleware::error::AppError;

/// Largest accepted JSON body; post content is sent inline as HTML.
const JSON_LIMIT: usize = 8 * 1024 * 1024;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err: JsonPayloadError, _req| AppError::BadRequest(err.to_string()).into())
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/load", web::get().to(posts::load_post))
                    .route("/save", web::post().to(posts::save_post))
                    .route("/delete", web::delete().to(posts::delete_post))
                    .route("/analyze", web::post().to(posts::analyze_post)),
            )
            .route("/media/upload", web::post().to(media::upload_media)),
    );
}
