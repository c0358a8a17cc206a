/// WebSocket session handler for a game.
///
/// This actor bridges one client connection to a `GameSession` actor: it subscribes to
/// state updates on start, forwards parsed client intents, and unsubscribes on stop.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse, error, http::StatusCode};
use actix_web_actors::ws;
use log::{debug, warn};
use std::borrow::Cow;
use uuid::Uuid;

use crate::game::types::GridSize;
use crate::server::game_session::messages::{
    ClientAction, ServerMessage, SelectTile, NewGame, ChangeDifficulty, Subscribe, Unsubscribe,
};
use crate::server::game_session::server::{GameSession, CreateGame, GetGameSession};
use crate::server::ws_error::{http_error_response, ws_error_message};

pub struct GameSocket {
    pub client_id: Uuid,
    pub game_id: Uuid,
    pub session_addr: Addr<GameSession>,
}

impl Actor for GameSocket {
    type Context = ws::WebsocketContext<Self>;

    /// Subscribes to the game. A session that is gone or shutting down closes the socket.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr
            .send(Subscribe {
                client_id: self.client_id,
                addr: ctx.address().recipient(),
            })
            .into_actor(self)
            .then(|res, act, ctx| {
                if !matches!(res, Ok(true)) {
                    warn!("[GameSocket] Game {} is no longer available", act.game_id);
                    ctx.text(ws_error_message(
                        "GAME_CLOSED",
                        "This game session has ended",
                        Some(&act.game_id.to_string()),
                    ));
                    ctx.close(Some(ws::CloseReason {
                        code: ws::CloseCode::Away,
                        description: Some("Game session ended".into()),
                    }));
                    ctx.stop();
                }
                fut::ready(())
            })
            .wait(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.session_addr.do_send(Unsubscribe { client_id: self.client_id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientAction>(&text) {
                    Ok(ClientAction::SelectTile { position }) => {
                        self.session_addr.do_send(SelectTile { position });
                    }
                    Ok(ClientAction::NewGame) => {
                        self.session_addr.do_send(NewGame);
                    }
                    Ok(ClientAction::ChangeDifficulty { size }) => {
                        self.session_addr.do_send(ChangeDifficulty { size });
                    }
                    Ok(ClientAction::Ping) => {}
                    Err(e) => {
                        debug!("[GameSocket] Invalid message from {}: {}", self.client_id, e);
                        ctx.text(ws_error_message(
                            "INVALID_ACTION",
                            "Invalid client message",
                            Some(&e.to_string()),
                        ));
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!("[GameSocket] Protocol error on {}: {}", self.game_id, e);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerMessage> for GameSocket {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("[GameSocket] Failed to serialize ServerMessage: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Failed to serialize game state", None));
            }
        }
    }
}

/// Extract the `size` query parameter, if any.
fn size_from_query(query: &str) -> GridSize {
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(key, _)| *key == "size")
        .map(|(_, value)| {
            let decoded = urlencoding::decode(value).unwrap_or(Cow::Borrowed(""));
            GridSize::parse_or_default(&decoded)
        })
        .unwrap_or_default()
}

/// WebSocket endpoint creating a fresh game.
///
/// Optional query parameter: `size` (`2x2`, `4x4`, `6x6`); unknown values use the default grid.
pub async fn ws_new_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let size = size_from_query(req.query_string());

    // Reject non-WebSocket requests before a session is created for them.
    if let Err(e) = ws::handshake(&req) {
        debug!("[GameSocket] Handshake rejected on /ws/game: {}", e);
        return Err(e.into());
    }

    let created = data.game_session_manager
        .send(CreateGame { size })
        .await
        .map_err(error::ErrorInternalServerError)?;
    let (game_id, session_addr) = match created {
        Ok(created) => created,
        Err(e) => {
            return Ok(http_error_response(
                "CONFIGURATION_FAULT",
                &e.to_string(),
                Some(size.label()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    let client_id = Uuid::new_v4();
    let started = ws::start(
        GameSocket {
            client_id,
            game_id,
            session_addr: session_addr.clone(),
        },
        &req,
        stream,
    );
    if started.is_err() {
        // No socket will ever subscribe; an empty unsubscribe stops and deregisters the session.
        session_addr.do_send(Unsubscribe { client_id });
    }
    started
}

/// WebSocket endpoint attaching to an existing game.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let raw_id = req.match_info().get("game_id").unwrap_or("");
    let game_id = Uuid::parse_str(raw_id).map_err(error::ErrorBadRequest)?;

    let session_addr = match data.game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
    {
        Ok(addr) => addr,
        Err(message) => {
            return Ok(http_error_response(
                "GAME_NOT_FOUND",
                &message,
                Some(raw_id),
                StatusCode::NOT_FOUND,
            ));
        }
    };

    ws::start(
        GameSocket {
            client_id: Uuid::new_v4(),
            game_id,
            session_addr,
        },
        &req,
        stream,
    )
}
