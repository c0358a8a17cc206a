//! Board construction: symbol deck and tile layout.

pub mod deck;
pub mod board;

pub use board::*;
