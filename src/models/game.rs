//! Match, Round, and the slot/winner vocabulary shared by all formats.

use serde::{Deserialize, Serialize};

/// Unique identifier for a match within one tournament.
///
/// Ids are allocated deterministically by each format engine (bracket matches
/// count up from 1, losers-bracket matches from 1000), so a given roster and
/// seed always produce the same ids.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchId(pub u32);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// One side of a match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Slot not yet populated (waiting on an earlier match).
    #[default]
    Open,
    /// No opponent; the other side advances automatically.
    Bye,
    Player(String),
}

impl Slot {
    /// Player name if this slot holds a real player.
    pub fn player(&self) -> Option<&str> {
        match self {
            Slot::Player(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Slot::Open)
    }
}

/// Which side won a match. Draws occur in swiss and round robin only.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchWinner {
    Player1,
    Player2,
    Draw,
}

/// A single match between two slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based round number within the owning format.
    pub round: u32,
    /// 0-based position within the round.
    pub position: usize,
    pub player1: Slot,
    pub player2: Slot,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner: Option<MatchWinner>,
    pub completed: bool,
    /// Elimination formats: match the winner advances to.
    pub next_match_id: Option<MatchId>,
    /// Elimination formats: the two matches feeding this one.
    pub source_match1: Option<MatchId>,
    pub source_match2: Option<MatchId>,
}

impl Match {
    pub fn new(id: MatchId, round: u32, position: usize, player1: Slot, player2: Slot) -> Self {
        Self {
            id,
            round,
            position,
            player1,
            player2,
            score1: None,
            score2: None,
            winner: None,
            completed: false,
            next_match_id: None,
            source_match1: None,
            source_match2: None,
        }
    }

    /// Name of the winning player, if the match is decided and the winning
    /// side holds a real player.
    pub fn winner_name(&self) -> Option<&str> {
        match self.winner? {
            MatchWinner::Player1 => self.player1.player(),
            MatchWinner::Player2 => self.player2.player(),
            MatchWinner::Draw => None,
        }
    }

    /// Name of the losing player (real players only).
    pub fn loser_name(&self) -> Option<&str> {
        match self.winner? {
            MatchWinner::Player1 => self.player2.player(),
            MatchWinner::Player2 => self.player1.player(),
            MatchWinner::Draw => None,
        }
    }

    /// True if either side is the given player.
    pub fn involves(&self, player: &str) -> bool {
        self.player1.player() == Some(player) || self.player2.player() == Some(player)
    }
}

/// Ordered container of the matches sharing a round number.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    /// Human label ("Semifinals", "Losers Round 2"); elimination formats only.
    pub name: Option<String>,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(number: u32, matches: Vec<Match>) -> Self {
        Self {
            number,
            name: None,
            matches,
        }
    }

    pub fn labeled(number: u32, name: impl Into<String>, matches: Vec<Match>) -> Self {
        Self {
            number,
            name: Some(name.into()),
            matches,
        }
    }
}
