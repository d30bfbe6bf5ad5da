//! # ab-api
//!
//! The web routing and orchestration layer for Advert-Board.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the advert routes.
///
/// Scoped so the main binary can mount the API under a different prefix
/// if needed (e.g. /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/adverts")
            .route("", web::post().to(handlers::create_advert))
            .route("", web::get().to(handlers::list_adverts))
            .route("/{id}/cancel", web::post().to(handlers::cancel_advert))
            .route("/{id}/restore", web::post().to(handlers::restore_advert))
            .route("/{id}", web::put().to(handlers::edit_advert)),
    );
}
