//! HTTP and WebSocket routing configuration.
//!
//! A new connection on `/ws/game` deals a fresh game; `/ws/game/{game_id}` attaches
//! to a game that is already running.

use actix_web::{web, HttpResponse, error};
use serde_json::json;
use crate::server::game_session::server::CountGames;
use crate::server::game_session::session::{ws_game, ws_new_game};
use crate::server::state::AppState;

/// Liveness probe, with the number of live games.
async fn health(data: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let live_games = data.game_session_manager
        .send(CountGames)
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok", "live_games": live_games })))
}

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws/game")
            .route(web::get().to(ws_new_game))
    )
    .service(
        web::resource("/ws/game/{game_id}")
            .route(web::get().to(ws_game))
    )
    .service(
        web::resource("/health")
            .route(web::get().to(health))
    );
}
