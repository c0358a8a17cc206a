//! Game core: deck generation, board layout and the turn state machine.
//!
//! Nothing in here knows about actors, sockets or wall-clock time; the server layer
//! drives the clock and the delayed resolutions.

pub mod types;
pub mod error;
pub mod utils;
pub mod grid;
pub mod snapshot;
pub mod state;
