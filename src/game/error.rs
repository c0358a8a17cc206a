//! Error types for the game core.
//!
//! Rejected selections are not errors; see [`crate::game::state::IgnoreReason`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The symbol catalog cannot supply enough distinct pairs.
    #[error("requested {requested} pairs but the symbol catalog only holds {available}")]
    ConfigurationFault { requested: usize, available: usize },

    #[error("unsupported grid size '{0}' (expected 2x2, 4x4 or 6x6)")]
    InvalidGridSize(String),
}
