//! Ladder: an ordered ranking where players challenge upward and swap ranks
//! on a successful challenge.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formats::validate_roster;
use crate::models::TournamentError;

/// How far up a challenge may reach unless the caller says otherwise.
pub const DEFAULT_MAX_RUNGS: u32 = 3;

/// One rung of the ladder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LadderEntry {
    /// 1 is the top; ranks are always a contiguous permutation of 1..=N.
    pub rank: u32,
    pub player: String,
    pub wins: u32,
    pub losses: u32,
    pub challenges: u32,
    pub defenses: u32,
    pub last_active: Option<DateTime<Utc>>,
}

/// The ladder, kept sorted by rank ascending.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub entries: Vec<LadderEntry>,
}

/// Create a ladder with ranks 1..=N, assigned to the input order or to a
/// random permutation drawn from the supplied RNG.
pub fn create_ladder(
    players: &[String],
    randomize: bool,
    rng: &mut impl Rng,
) -> Result<Ladder, TournamentError> {
    validate_roster(players, 2)?;
    let mut ordered = players.to_vec();
    if randomize {
        ordered.shuffle(rng);
    }
    Ok(Ladder {
        entries: ordered
            .into_iter()
            .enumerate()
            .map(|(index, player)| LadderEntry {
                rank: index as u32 + 1,
                player,
                wins: 0,
                losses: 0,
                challenges: 0,
                defenses: 0,
                last_active: None,
            })
            .collect(),
    })
}

impl Ladder {
    /// A challenge is valid only strictly upward and within `max_rungs`.
    /// Advisory: `process_challenge` does not re-check this.
    pub fn is_valid_challenge(
        &self,
        challenger_rank: u32,
        defender_rank: u32,
        max_rungs: u32,
    ) -> bool {
        defender_rank < challenger_rank && challenger_rank - defender_rank <= max_rungs
    }

    /// Every entry the given rank is allowed to challenge.
    pub fn available_targets(&self, challenger_rank: u32, max_rungs: u32) -> Vec<&LadderEntry> {
        self.entries
            .iter()
            .filter(|e| self.is_valid_challenge(challenger_rank, e.rank, max_rungs))
            .collect()
    }

    /// Apply a challenge outcome. A challenger win swaps the two ranks; a
    /// loss leaves ranks unchanged. Either way both sides' counters and
    /// `last_active` update and the ladder is re-sorted by rank. Unknown
    /// ranks are a no-op.
    pub fn process_challenge(
        &mut self,
        challenger_rank: u32,
        defender_rank: u32,
        challenger_wins: bool,
    ) {
        let challenger_idx = self.entries.iter().position(|e| e.rank == challenger_rank);
        let defender_idx = self.entries.iter().position(|e| e.rank == defender_rank);
        let (Some(challenger_idx), Some(defender_idx)) = (challenger_idx, defender_idx) else {
            return;
        };

        let now = Utc::now();
        if challenger_wins {
            let challenger = &mut self.entries[challenger_idx];
            challenger.wins += 1;
            challenger.challenges += 1;
            challenger.last_active = Some(now);
            challenger.rank = defender_rank;

            let defender = &mut self.entries[defender_idx];
            defender.losses += 1;
            defender.defenses += 1;
            defender.last_active = Some(now);
            defender.rank = challenger_rank;
            log::debug!(
                "ladder: rank {} taken from {} by a successful challenge",
                defender_rank,
                self.entries[defender_idx].player
            );
        } else {
            let defender = &mut self.entries[defender_idx];
            defender.wins += 1;
            defender.defenses += 1;
            defender.last_active = Some(now);

            let challenger = &mut self.entries[challenger_idx];
            challenger.losses += 1;
            challenger.challenges += 1;
            challenger.last_active = Some(now);
        }

        self.entries.sort_by_key(|e| e.rank);
    }
}
