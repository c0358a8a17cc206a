//! Main entry point for the Mystic Match backend.
//!
//! Initializes logging, starts the game session manager actor, and launches the HTTP
//! server with the WebSocket endpoints used by the presentation layer.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;
use server::game_session::server::GameSessionManager;

use crate::config::server::BindConfig;

pub mod config;
mod server;
mod game;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Start the GameSessionManager actor (owns every live game).
    let game_session_manager = GameSessionManager::new().start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(game_session_manager));

    let bind = BindConfig::from_env();
    info!("[Main] Listening on {}:{}", bind.host, bind.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((bind.host.as_str(), bind.port))?
    .run()
    .await
}
