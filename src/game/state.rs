//! Game state machine.
//!
//! Owns the board, the pending selection and the counters, and implements the
//! flip / compare / resolve cycle. Timing is not handled here: a pair completed by
//! [`GameState::select_tile`] stays locked until the host calls
//! [`GameState::resolve_pending`] after [`Resolution::delay`] has elapsed.

use std::time::Duration;

use log::debug;
use rand::Rng;
use uuid::Uuid;

use crate::config::game::{MATCH_RESOLVE_DELAY_MS, MISMATCH_RESOLVE_DELAY_MS};
use crate::game::error::GameError;
use crate::game::grid::deal_board;
use crate::game::snapshot::{GameSnapshot, GameStats, TileView};
use crate::game::types::{GridSize, Phase, Tile};

/// Why a selection was dropped. Ignored input is a deliberate no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Locked,
    Finished,
    AlreadyMatched,
    AlreadyPending,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Match,
    Mismatch,
}

/// A completed pair of selections waiting to be settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub first: usize,
    pub second: usize,
    pub outcome: PairOutcome,
}

impl Resolution {
    /// Matches settle fast, mismatches stay visible long enough to be memorized.
    pub fn delay(&self) -> Duration {
        match self.outcome {
            PairOutcome::Match => Duration::from_millis(MATCH_RESOLVE_DELAY_MS),
            PairOutcome::Mismatch => Duration::from_millis(MISMATCH_RESOLVE_DELAY_MS),
        }
    }
}

/// Result of [`GameState::select_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Ignored(IgnoreReason),
    /// First tile of a turn is face up; waiting for its partner.
    Flipped { position: usize },
    /// Second tile is face up and the board is locked until resolution.
    PairCompleted(Resolution),
}

/// Result of [`GameState::resolve_pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPair {
    pub resolution: Resolution,
    /// True when this resolution matched the last pair.
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct GameState {
    size: GridSize,
    tiles: Vec<Tile>,
    pending: Vec<usize>,
    resolution: Option<Resolution>,
    move_count: u32,
    matched_pairs: usize,
    elapsed_seconds: u64,
    phase: Phase,
}

impl GameState {
    /// Deal a new game: fresh shuffled board, counters at zero, phase `Idle`.
    pub fn new<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Result<Self, GameError> {
        let tiles = deal_board(size, rng)?;
        Ok(Self::with_tiles(size, tiles))
    }

    fn with_tiles(size: GridSize, tiles: Vec<Tile>) -> Self {
        Self {
            size,
            tiles,
            pending: Vec::with_capacity(2),
            resolution: None,
            move_count: 0,
            matched_pairs: 0,
            elapsed_seconds: 0,
            phase: Phase::Idle,
        }
    }

    /// Board with a known layout, for tests that need to know where the pairs are.
    #[cfg(test)]
    pub(crate) fn from_contents(size: GridSize, contents: &[&'static str]) -> Self {
        use crate::game::grid::board_from_contents;
        use crate::game::types::Symbol;

        assert_eq!(contents.len(), size.tile_count(), "layout does not fit the grid");
        let tiles = board_from_contents(contents.iter().copied().map(Symbol));
        Self::with_tiles(size, tiles)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_selection(&self) -> &[usize] {
        &self.pending
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Handle a "player selected tile at `position`" intent.
    pub fn select_tile(&mut self, position: usize) -> Selection {
        if let Some(reason) = self.ignore_reason(position) {
            debug!("[GameState] Ignored selection of tile {}: {:?}", position, reason);
            return Selection::Ignored(reason);
        }

        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
        }

        self.tiles[position].is_flipped = true;
        self.pending.push(position);

        if self.pending.len() < 2 {
            return Selection::Flipped { position };
        }

        self.move_count += 1;
        self.phase = Phase::Locked;

        let (first, second) = (self.pending[0], self.pending[1]);
        let outcome = if self.tiles[first].content == self.tiles[second].content {
            PairOutcome::Match
        } else {
            PairOutcome::Mismatch
        };
        let resolution = Resolution { first, second, outcome };
        self.resolution = Some(resolution);
        Selection::PairCompleted(resolution)
    }

    fn ignore_reason(&self, position: usize) -> Option<IgnoreReason> {
        match self.phase {
            Phase::Locked => return Some(IgnoreReason::Locked),
            Phase::Finished => return Some(IgnoreReason::Finished),
            Phase::Idle | Phase::Running => {}
        }
        let tile = match self.tiles.get(position) {
            Some(tile) => tile,
            None => return Some(IgnoreReason::OutOfBounds),
        };
        if tile.is_matched {
            return Some(IgnoreReason::AlreadyMatched);
        }
        if self.pending.contains(&position) {
            return Some(IgnoreReason::AlreadyPending);
        }
        None
    }

    /// Settle the locked pair, if any.
    ///
    /// A match marks both tiles permanently and may finish the game; a mismatch turns
    /// both tiles face down again. Either way the pending selection is cleared.
    pub fn resolve_pending(&mut self) -> Option<ResolvedPair> {
        let resolution = self.resolution.take()?;
        let Resolution { first, second, outcome } = resolution;

        match outcome {
            PairOutcome::Match => {
                for idx in [first, second] {
                    self.tiles[idx].is_matched = true;
                }
                self.matched_pairs += 1;
            }
            PairOutcome::Mismatch => {
                for idx in [first, second] {
                    self.tiles[idx].is_flipped = false;
                }
            }
        }
        self.pending.clear();

        let total = self.total_pairs();
        let finished = outcome == PairOutcome::Match && total > 0 && self.matched_pairs == total;
        self.phase = if finished { Phase::Finished } else { Phase::Running };

        Some(ResolvedPair { resolution, finished })
    }

    /// Advance the clock by one second. Returns false when the clock is not running.
    pub fn tick(&mut self) -> bool {
        if !self.phase.is_clock_active() {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            moves: self.move_count,
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs(),
            time: self.elapsed_seconds,
        }
    }

    /// Read-only view for the presentation layer. Face-down symbols are withheld.
    pub fn snapshot(&self, game_id: Uuid, generation: u64) -> GameSnapshot {
        let tiles = self
            .tiles
            .iter()
            .map(|tile| TileView {
                id: tile.id,
                content: tile.is_face_up().then(|| tile.content.to_string()),
                is_flipped: tile.is_flipped,
                is_matched: tile.is_matched,
            })
            .collect();

        GameSnapshot::new(game_id, generation, self.size, tiles, self.phase, self.stats())
    }
}
