//! Data structures shared across formats plus the tagged tournament record.

mod game;
mod tournament;

pub use game::{Match, MatchId, MatchWinner, Round, Slot};
pub use tournament::{Format, FormatKind, Tournament, TournamentError, TournamentId};
