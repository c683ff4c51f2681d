//! Bracket seed order: keeps byes away from each other in round 1.

use crate::models::TournamentError;

/// Canonical slot order for a bracket of the given size, as 1-based seed
/// numbers. For size 8 this is `[1, 8, 4, 5, 2, 7, 3, 6]`: adjacent pairs
/// form the round-1 matches, so the top seed meets the bottom seed and byes
/// (seeds past the player count) land opposite the strongest seeds, never
/// opposite each other.
///
/// `bracket_size` must be a power of two >= 2.
pub fn seed_order(bracket_size: usize) -> Result<Vec<usize>, TournamentError> {
    if bracket_size < 2 || !bracket_size.is_power_of_two() {
        return Err(TournamentError::InvalidBracketSize(bracket_size));
    }

    // Start from the two-slot order and interleave each entry with its
    // complement against 2^round + 1 until the full size is reached.
    let mut order = vec![1, 2];
    let mut size = 2;
    while size < bracket_size {
        size *= 2;
        let complement = size + 1;
        order = order
            .iter()
            .flat_map(|&seed| [seed, complement - seed])
            .collect();
    }
    Ok(order)
}
