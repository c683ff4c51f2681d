//! Killer: a multi-life elimination game played in randomized turn order.
//!
//! Miss a pot or commit a foul: lose a life. Pot the black: gain one. A
//! player at zero lives is out; the last player standing wins.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formats::validate_roster;
use crate::models::TournamentError;

/// Lives each player starts with unless the caller says otherwise.
pub const DEFAULT_STARTING_LIVES: u32 = 3;

/// Outcome of one visit to the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnResult {
    /// Successful pot; no life change.
    Pot,
    Miss,
    Foul,
    /// Potted the black: gain a life.
    Black,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KillerPlayer {
    pub name: String,
    pub lives: u32,
    pub eliminated: bool,
}

/// Append-only log entry, one per processed turn.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub player: String,
    pub action: TurnResult,
    pub lives_after: u32,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of game progress.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KillerStats {
    pub active_players: usize,
    pub eliminated_players: usize,
    pub total_lives: u32,
    pub turns_played: usize,
}

/// Killer game state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KillerGame {
    /// Players in turn order (randomized at creation).
    pub players: Vec<KillerPlayer>,
    pub current_player_index: usize,
    pub game_over: bool,
    pub winner: Option<String>,
    pub turn_history: Vec<TurnRecord>,
}

/// Create a game with a randomized turn order drawn from the supplied RNG.
pub fn create_killer_game(
    players: &[String],
    starting_lives: u32,
    rng: &mut impl Rng,
) -> Result<KillerGame, TournamentError> {
    validate_roster(players, 2)?;
    if starting_lives == 0 {
        return Err(TournamentError::InvalidStartingLives);
    }
    let mut order = players.to_vec();
    order.shuffle(rng);
    Ok(KillerGame {
        players: order
            .into_iter()
            .map(|name| KillerPlayer {
                name,
                lives: starting_lives,
                eliminated: false,
            })
            .collect(),
        current_player_index: 0,
        game_over: false,
        winner: None,
        turn_history: Vec::new(),
    })
}

impl KillerGame {
    /// Whoever is at the table, or `None` once the game is over.
    pub fn current_player(&self) -> Option<&KillerPlayer> {
        if self.game_over {
            return None;
        }
        self.players.get(self.current_player_index)
    }

    /// Apply one turn for the current player, append it to the history, and
    /// either declare the sole survivor or pass the table to the next
    /// non-eliminated player. No-op once the game is over.
    pub fn process_turn(&mut self, result: TurnResult) {
        if self.game_over {
            return;
        }
        let Some(player) = self.players.get_mut(self.current_player_index) else {
            return;
        };

        match result {
            TurnResult::Pot => {}
            TurnResult::Miss | TurnResult::Foul => {
                player.lives = player.lives.saturating_sub(1);
                if player.lives == 0 {
                    player.eliminated = true;
                    log::debug!("killer: {} is out of lives", player.name);
                }
            }
            TurnResult::Black => {
                player.lives += 1;
            }
        }

        self.turn_history.push(TurnRecord {
            player: player.name.clone(),
            action: result,
            lives_after: player.lives,
            timestamp: Utc::now(),
        });

        let mut survivors = self.players.iter().filter(|p| !p.eliminated);
        let sole = survivors.next().filter(|_| survivors.next().is_none());
        if let Some(winner) = sole {
            self.winner = Some(winner.name.clone());
            self.game_over = true;
            log::info!("killer game won by {}", winner.name);
            return;
        }
        self.advance_turn();
    }

    /// Move to the next non-eliminated player. Bounded to one full cycle so a
    /// table of eliminated players cannot loop forever; the degenerate case
    /// lands back on the same index.
    fn advance_turn(&mut self) {
        let count = self.players.len();
        let mut next = (self.current_player_index + 1) % count;
        let mut attempts = 0;
        while self.players[next].eliminated && attempts < count {
            next = (next + 1) % count;
            attempts += 1;
        }
        self.current_player_index = next;
    }

    pub fn stats(&self) -> KillerStats {
        let eliminated = self.players.iter().filter(|p| p.eliminated).count();
        KillerStats {
            active_players: self.players.len() - eliminated,
            eliminated_players: eliminated,
            total_lives: self.players.iter().map(|p| p.lives).sum(),
            turns_played: self.turn_history.len(),
        }
    }

    /// Players in the order they were eliminated (first out first), derived
    /// from the turn each player's lives first reached zero.
    pub fn elimination_order(&self) -> Vec<String> {
        let mut eliminated: Vec<String> = Vec::new();
        for turn in &self.turn_history {
            if turn.lives_after == 0 && !eliminated.contains(&turn.player) {
                eliminated.push(turn.player.clone());
            }
        }
        eliminated
    }
}
