use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::game::error::GameError;

/// Opaque tile face. Two tiles form a pair when their symbols are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol(pub &'static str);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Square grid sizes offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    #[serde(rename = "2x2")]
    Small,
    #[serde(rename = "4x4")]
    Medium,
    #[serde(rename = "6x6")]
    Large,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Small, GridSize::Medium, GridSize::Large];

    /// Edge length of the square grid.
    pub fn edge(self) -> usize {
        match self {
            GridSize::Small => 2,
            GridSize::Medium => 4,
            GridSize::Large => 6,
        }
    }

    pub fn rows(self) -> usize {
        self.edge()
    }

    pub fn cols(self) -> usize {
        self.edge()
    }

    pub fn tile_count(self) -> usize {
        self.rows() * self.cols()
    }

    pub fn pair_count(self) -> usize {
        self.tile_count() / 2
    }

    pub fn label(self) -> &'static str {
        match self {
            GridSize::Small => "2x2",
            GridSize::Medium => "4x4",
            GridSize::Large => "6x6",
        }
    }

    fn from_edge(edge: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.edge() == edge)
    }

    /// Lenient parse used for query strings: anything unknown becomes the default grid.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl Default for GridSize {
    fn default() -> Self {
        crate::config::game::DEFAULT_GRID_SIZE
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either a label (`"6x6"`) or a bare edge length (`"6"`).
impl FromStr for GridSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let edge = match trimmed.split_once('x') {
            Some((rows, cols)) if rows == cols => rows.parse::<usize>().ok(),
            Some(_) => None,
            None => trimmed.parse::<usize>().ok(),
        };
        edge.and_then(Self::from_edge)
            .ok_or_else(|| GameError::InvalidGridSize(s.to_string()))
    }
}

/// A single card on the board. `id` doubles as the board position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub id: usize,
    pub content: Symbol,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Tile {
    pub fn new(id: usize, content: Symbol) -> Self {
        Self {
            id,
            content,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Face-up either temporarily or permanently.
    pub fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }
}

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Board dealt, no tile selected yet, clock not started.
    Idle,
    /// Clock running, zero or one tile awaiting a partner.
    Running,
    /// Two tiles face up, resolution pending; selections are rejected.
    Locked,
    /// Every pair matched. Terminal.
    Finished,
}

impl Phase {
    /// The clock advances only between the first selection and the final match.
    pub fn is_clock_active(self) -> bool {
        matches!(self, Phase::Running | Phase::Locked)
    }
}
