mod config;
mod error;
mod host;
mod lang;
mod renders;
mod services;
mod state;

use crate::config::Settings;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(std::io::Error::other)?;
    let (host, port) = settings.bind_addr();

    info!("Server running at http://{}:{}", host, port);
    info!("Reading host tables from {}", settings.database);
    if settings.plugin.key.is_none() {
        info!("No activation key configured, podcast creator disabled");
    }

    let state = AppState::new(settings).map_err(std::io::Error::other)?;

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .app_data(web::Data::new(state.clone()))
            .service(services::filter::configure_routes())
            .default_service(web::route().to(services::assets::serve_embedded))
    })
        .bind((host, port))?
        .run()
        .await
}
