mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{AppConfig, ConnectionMode};
use database::{MongoDB, ScopedMongoStore, UserStore};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    log::info!("🚀 Starting Registration Service...");
    log::info!(
        "📊 Database: {} / {} ({:?} connections)",
        config.mongodb_uri,
        config.database_name,
        config.connection_mode
    );

    // Pooled mode keeps a handle so the pool can be closed after the server stops
    let (store, pool): (Arc<dyn UserStore>, Option<MongoDB>) = match config.connection_mode {
        ConnectionMode::Pooled => {
            let db = MongoDB::connect(&config).await?;
            (Arc::new(db.clone()) as Arc<dyn UserStore>, Some(db))
        }
        ConnectionMode::PerRequest => {
            let scoped = ScopedMongoStore::new(&config).await?;
            (Arc::new(scoped) as Arc<dyn UserStore>, None)
        }
    };

    let store_data: web::Data<dyn UserStore> = web::Data::from(store);
    let config_data = web::Data::new(config.clone());
    let bind_address = config.bind_address();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let cors = config_data
            .cors_allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .app_data(store_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi())
            )
            .route("/health", web::get().to(api::health::health_check))
            .route("/register", web::post().to(api::register::register))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    if let Some(db) = pool {
        db.shutdown().await;
    }

    log::info!("👋 Registration Service stopped");
    Ok(())
}
