//! Format engines: seeding, brackets, round robin, swiss, ladder, killer.

mod bracket;
mod double;
mod killer;
mod ladder;
mod roundrobin;
mod seeding;
mod swiss;

pub use bracket::{bracket_size_for, generate_single_elimination, Bracket};
pub use double::{generate_double_elimination, DoubleBracket, GrandFinal};
pub use killer::{
    create_killer_game, KillerGame, KillerPlayer, KillerStats, TurnRecord, TurnResult,
    DEFAULT_STARTING_LIVES,
};
pub use ladder::{create_ladder, Ladder, LadderEntry, DEFAULT_MAX_RUNGS};
pub use roundrobin::{generate_round_robin, Schedule, StandingsEntry};
pub use seeding::seed_order;
pub use swiss::{create_swiss_tournament, SwissPlayer, SwissTournament};

use crate::models::TournamentError;

/// Check a roster for length and duplicate names (case-insensitive, like the
/// rest of the league tooling treats names).
pub(crate) fn validate_roster(players: &[String], required: usize) -> Result<(), TournamentError> {
    if players.len() < required {
        return Err(TournamentError::NotEnoughPlayers {
            required,
            got: players.len(),
        });
    }
    for (i, name) in players.iter().enumerate() {
        if players[..i]
            .iter()
            .any(|other| other.eq_ignore_ascii_case(name))
        {
            return Err(TournamentError::DuplicatePlayerName(name.clone()));
        }
    }
    Ok(())
}
