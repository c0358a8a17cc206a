use rand::Rng;

use crate::game::error::GameError;
use crate::game::grid::deck::generate;
use crate::game::types::{GridSize, Symbol, Tile};

/// Deal a fresh face-down board for the given grid size.
pub fn deal_board<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Result<Vec<Tile>, GameError> {
    let contents = generate(size.pair_count(), rng)?;
    Ok(board_from_contents(contents))
}

/// Lay out tiles in the given order; position `i` gets id `i`.
pub fn board_from_contents(contents: impl IntoIterator<Item = Symbol>) -> Vec<Tile> {
    contents
        .into_iter()
        .enumerate()
        .map(|(id, content)| Tile::new(id, content))
        .collect()
}
