//! Deck generation.
//!
//! Builds the shuffled, paired symbol sequence that a board is dealt from.

use log::debug;
use rand::Rng;

use crate::game::error::GameError;
use crate::game::types::Symbol;

/// Symbol catalog. Must hold at least as many entries as the largest grid has pairs.
pub const SYMBOLS: [Symbol; 24] = [
    Symbol("🌟"), Symbol("🌙"), Symbol("☀️"), Symbol("☁️"),
    Symbol("❄️"), Symbol("🔥"), Symbol("💧"), Symbol("⚡️"),
    Symbol("💎"), Symbol("🍀"), Symbol("🍎"), Symbol("🌈"),
    Symbol("🎨"), Symbol("🎭"), Symbol("🎸"), Symbol("🚀"),
    Symbol("🛸"), Symbol("🪐"), Symbol("🍄"), Symbol("🌵"),
    Symbol("🌺"), Symbol("🍁"), Symbol("🧿"), Symbol("🧬"),
];

/// In-place Fisher–Yates shuffle: walk from the last index down to 1,
/// swapping each slot with a uniformly chosen slot at or below it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Take the first `pair_count` catalog symbols, duplicate them and shuffle.
///
/// Asking for more pairs than the catalog holds is a configuration fault;
/// symbols are never repeated to make up the difference.
pub fn generate<R: Rng + ?Sized>(pair_count: usize, rng: &mut R) -> Result<Vec<Symbol>, GameError> {
    if pair_count > SYMBOLS.len() {
        return Err(GameError::ConfigurationFault {
            requested: pair_count,
            available: SYMBOLS.len(),
        });
    }

    let selected = &SYMBOLS[..pair_count];
    let mut contents: Vec<Symbol> = selected.iter().chain(selected.iter()).copied().collect();
    shuffle(&mut contents, rng);

    debug!("[Deck] Generated {} cards ({} pairs)", contents.len(), pair_count);
    Ok(contents)
}
