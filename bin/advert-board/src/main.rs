//! # Advert-Board Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};

use ab_api::handlers::AppState;
use ab_core::service::AdvertService;

mod config;

// Feature-gated imports: storage plugins are compiled to order.
#[cfg(feature = "db-sqlite")]
use ab_db_sqlite::SqliteAdvertRepo;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg = config::load()?;

    #[cfg(feature = "db-sqlite")]
    let repo = SqliteAdvertRepo::new(&cfg.database_url).await?;

    let state = web::Data::new(AppState {
        adverts: AdvertService::new(Box::new(repo)),
    });

    log::info!("advert-board starting on http://{}", cfg.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ab_api::middleware::standard_middleware())
            .configure(ab_api::configure_routes)
    })
    .bind(cfg.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
