use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::game::error::GameError;
use crate::game::snapshot::GameSnapshot;
use crate::game::types::GridSize;
use crate::game::utils::format_duration_short;

// Client -> server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", content = "data")]
pub enum ClientAction {
    SelectTile { position: usize },
    NewGame,
    ChangeDifficulty { size: GridSize },
    Ping,
}

// Server -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerMessage {
    GameState(GameSnapshot),
    Victory(VictorySummary),
    Error {
        code: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        context: Option<String>,
    },
}

impl ServerMessage {
    pub fn game_state(snapshot: GameSnapshot) -> Self {
        Self::GameState(snapshot)
    }
    pub fn error(code: &str, message: &str, context: Option<&str>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
            context: context.map(str::to_string),
        }
    }
}

/// Final figures of a finished game.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VictorySummary {
    pub game_id: Uuid,
    pub moves: u32,
    pub elapsed_seconds: u64,
    pub time_display: String,
}

impl VictorySummary {
    pub fn new(game_id: Uuid, moves: u32, elapsed_seconds: u64) -> Self {
        Self {
            game_id,
            moves,
            elapsed_seconds,
            time_display: format_duration_short(elapsed_seconds),
        }
    }
}

/// "Player selected tile at `position`."
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct SelectTile {
    pub position: usize,
}

/// Restart at the current grid size.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<(), GameError>")]
pub struct NewGame;

/// Restart at another grid size.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<(), GameError>")]
pub struct ChangeDifficulty {
    pub size: GridSize,
}

/// Attach a client. Answers false once the session is shutting down.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Subscribe {
    pub client_id: Uuid,
    pub addr: Recipient<ServerMessage>,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Unsubscribe {
    pub client_id: Uuid,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "GameSnapshot")]
pub struct GetSnapshot;
