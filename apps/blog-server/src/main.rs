//! # Quill Blog Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod flash;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    let state = AppState::new(&config).await;

    tracing::info!(
        host = %config.host,
        port = config.port,
        public_url = %config.public_url,
        storage = state.storage_backend,
        "Starting Quill blog server"
    );

    HttpServer::new(move || {
        let routes_state = state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, &routes_state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
