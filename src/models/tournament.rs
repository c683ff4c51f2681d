//! Tournament record: a tagged variant over the six format engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::formats::{
    Bracket, DoubleBracket, KillerGame, Ladder, Schedule, SwissTournament,
};

/// Errors that can occur when constructing a tournament.
///
/// Result application and queries never fail: unknown identifiers are
/// documented no-ops, so callers that want hard failures validate up front.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Too few players for the chosen format.
    NotEnoughPlayers { required: usize, got: usize },
    /// Two roster entries share a name (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    /// Seed order requested for a size that is not a power of two >= 2.
    InvalidBracketSize(usize),
    /// Killer games need at least one starting life.
    InvalidStartingLives,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughPlayers { required, got } => {
                write!(f, "Need at least {} players (got {})", required, got)
            }
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named {:?} already exists", name)
            }
            TournamentError::InvalidBracketSize(size) => {
                write!(f, "Bracket size {} is not a power of two >= 2", size)
            }
            TournamentError::InvalidStartingLives => {
                write!(f, "Starting lives must be at least 1")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament record.
pub type TournamentId = Uuid;

/// Which format a tournament uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
    Ladder,
    Killer,
}

/// Format-specific engine state. Each variant owns its own state shape and
/// transition rules; there is no shared behavior between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Format {
    SingleElimination(Bracket),
    DoubleElimination(DoubleBracket),
    RoundRobin(Schedule),
    Swiss(SwissTournament),
    Ladder(Ladder),
    Killer(KillerGame),
}

impl Format {
    pub fn kind(&self) -> FormatKind {
        match self {
            Format::SingleElimination(_) => FormatKind::SingleElimination,
            Format::DoubleElimination(_) => FormatKind::DoubleElimination,
            Format::RoundRobin(_) => FormatKind::RoundRobin,
            Format::Swiss(_) => FormatKind::Swiss,
            Format::Ladder(_) => FormatKind::Ladder,
            Format::Killer(_) => FormatKind::Killer,
        }
    }
}

/// A tournament record: identity and metadata around one engine state.
///
/// The engine holds no state of its own; callers own this value, pass it to
/// the format operations, and hand it to the persistence collaborator when
/// they want it stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub format: Format,
}

impl Tournament {
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            format,
        }
    }

    pub fn kind(&self) -> FormatKind {
        self.format.kind()
    }

    /// Whether the underlying event has finished. Ladders are open-ended and
    /// never complete.
    pub fn is_complete(&self) -> bool {
        match &self.format {
            Format::SingleElimination(b) => b.is_complete(),
            Format::DoubleElimination(b) => b.is_complete(),
            Format::RoundRobin(s) => s.is_complete(),
            Format::Swiss(t) => t.is_complete(),
            Format::Ladder(_) => false,
            Format::Killer(g) => g.game_over,
        }
    }

    /// Winner of a finished event: the final-match winner for brackets, the
    /// sole survivor for killer, the standings leader for round robin and
    /// swiss once complete. Ladders have no winner.
    pub fn winner(&self) -> Option<String> {
        match &self.format {
            Format::SingleElimination(b) => b.winner().map(str::to_owned),
            Format::DoubleElimination(b) => b.winner().map(str::to_owned),
            Format::RoundRobin(s) => {
                if !s.is_complete() {
                    return None;
                }
                s.standings().first().map(|e| e.player.clone())
            }
            Format::Swiss(t) => {
                if !t.is_complete() {
                    return None;
                }
                t.standings().first().map(|p| p.name.clone())
            }
            Format::Ladder(_) => None,
            Format::Killer(g) => g.winner.clone(),
        }
    }
}
