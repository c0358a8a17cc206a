/// Game configuration constants.
///
/// This module defines the pacing parameters of the turn cycle and the
/// grid used when a client does not ask for one.
use crate::game::types::GridSize;

/// Delay (in milliseconds) before a matched pair settles.
/// Kept short so a successful turn keeps its momentum.
pub const MATCH_RESOLVE_DELAY_MS: u64 = 300;

/// Delay (in milliseconds) before a mismatched pair flips back.
/// Longer than the match delay so the player can memorize both tiles.
pub const MISMATCH_RESOLVE_DELAY_MS: u64 = 1000;

/// Interval (in seconds) between two ticks of the game clock.
pub const TICK_INTERVAL_SECS: u64 = 1;

/// Grid used when a new session is created without an explicit size.
pub const DEFAULT_GRID_SIZE: GridSize = GridSize::Medium;
