//! Immutable views of a game, sent to the presentation layer.

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::game::types::{GridSize, Phase};
use crate::game::utils::{format_clock, progress_percent};

/// Status bar figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    /// Elapsed seconds.
    pub time: u64,
}

/// A tile as the presentation layer sees it. `content` is `None` while face down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    pub is_flipped: bool,
    pub is_matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub generation: u64,
    pub size: GridSize,
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<TileView>,
    pub phase: Phase,
    pub move_count: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub elapsed_seconds: u64,
    pub elapsed_display: String,
    pub progress_percent: f64,
    pub finished: bool,
}

impl GameSnapshot {
    pub fn new(
        game_id: Uuid,
        generation: u64,
        size: GridSize,
        tiles: Vec<TileView>,
        phase: Phase,
        stats: GameStats,
    ) -> Self {
        Self {
            game_id,
            generation,
            size,
            rows: size.rows(),
            cols: size.cols(),
            tiles,
            phase,
            move_count: stats.moves,
            matched_pairs: stats.matched_pairs,
            total_pairs: stats.total_pairs,
            elapsed_seconds: stats.time,
            elapsed_display: format_clock(stats.time),
            progress_percent: progress_percent(stats.matched_pairs, stats.total_pairs),
            finished: phase == Phase::Finished,
        }
    }
}
