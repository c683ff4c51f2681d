//! Tournament format engines for a cue-sports league: elimination brackets,
//! round robin, swiss, ladder, and killer.
//!
//! Every format offers a constructor, one or more result-application
//! operations, and completion/standings queries. All state lives in values
//! owned by the caller; operations mutate in place through `&mut self` and
//! nothing here blocks, spawns, or touches I/O. Randomized constructions
//! take an explicit `rand::Rng` so tests can seed them.

pub mod formats;
pub mod models;

pub use formats::{
    bracket_size_for, create_killer_game, create_ladder, create_swiss_tournament,
    generate_double_elimination, generate_round_robin, generate_single_elimination, seed_order,
    Bracket, DoubleBracket, GrandFinal, KillerGame, KillerPlayer, KillerStats, Ladder,
    LadderEntry, Schedule, StandingsEntry, SwissPlayer, SwissTournament, TurnRecord, TurnResult,
    DEFAULT_MAX_RUNGS, DEFAULT_STARTING_LIVES,
};
pub use models::{
    Format, FormatKind, Match, MatchId, MatchWinner, Round, Slot, Tournament, TournamentError,
    TournamentId,
};
