//! Swiss system: score-group pairing with repeat-opponent avoidance and
//! Buchholz tiebreaks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::formats::validate_roster;
use crate::models::{Match, MatchId, MatchWinner, Round, Slot, TournamentError};

/// A player's running score within a swiss event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwissPlayer {
    pub name: String,
    /// Win = 1.0, draw = 0.5. Byes count as wins.
    pub points: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Real opponents faced, in order. Byes are not recorded, so a bye never
    /// blocks a future pairing.
    pub opponents: Vec<String>,
    /// Sum of all recorded opponents' current points.
    pub buchholz: f64,
}

impl SwissPlayer {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            points: 0.0,
            wins: 0,
            losses: 0,
            draws: 0,
            opponents: Vec::new(),
            buchholz: 0.0,
        }
    }

    fn has_played(&self, other: &str) -> bool {
        self.opponents.iter().any(|o| o == other)
    }
}

/// Swiss tournament state: players, played rounds, and the round budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwissTournament {
    pub players: Vec<SwissPlayer>,
    pub rounds: Vec<Round>,
    pub current_round: u32,
    pub total_rounds: u32,
    pub completed: bool,
    next_match_id: u32,
}

/// Create a swiss tournament. When `num_rounds` is not given the usual
/// `ceil(log2(n)) + 1` round count is used.
pub fn create_swiss_tournament(
    players: &[String],
    num_rounds: Option<u32>,
) -> Result<SwissTournament, TournamentError> {
    validate_roster(players, 2)?;
    let default_rounds = players.len().next_power_of_two().trailing_zeros() + 1;
    Ok(SwissTournament {
        players: players.iter().map(|p| SwissPlayer::new(p)).collect(),
        rounds: Vec::new(),
        current_round: 0,
        total_rounds: num_rounds.unwrap_or(default_rounds),
        completed: false,
        next_match_id: 1,
    })
}

impl SwissTournament {
    /// Pair the next round: players sorted by (points, buchholz) descending,
    /// each unpaired player greedily matched with the nearest following
    /// unpaired player they have not yet faced. On odd rosters the first
    /// player left unpaired takes a 1-0 bye worth a full point; the bye is
    /// not recorded as an opponent, so repeat byes are possible.
    ///
    /// Once the round budget is spent this only marks the tournament
    /// completed.
    pub fn generate_next_round(&mut self) {
        if self.current_round >= self.total_rounds {
            self.completed = true;
            return;
        }
        let round_number = self.current_round + 1;

        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (&self.players[a], &self.players[b]);
            pb.points
                .total_cmp(&pa.points)
                .then(pb.buchholz.total_cmp(&pa.buchholz))
        });

        let mut paired = vec![false; self.players.len()];
        let mut matches: Vec<Match> = Vec::new();
        for (i, &a) in order.iter().enumerate() {
            if paired[a] {
                continue;
            }
            let candidate = order[i + 1..]
                .iter()
                .copied()
                .find(|&b| !paired[b] && !self.players[a].has_played(&self.players[b].name));
            let Some(b) = candidate else {
                continue;
            };
            paired[a] = true;
            paired[b] = true;
            matches.push(Match::new(
                MatchId(self.next_match_id),
                round_number,
                matches.len(),
                Slot::Player(self.players[a].name.clone()),
                Slot::Player(self.players[b].name.clone()),
            ));
            self.next_match_id += 1;
        }

        if order.len() % 2 == 1 {
            if let Some(&bye_idx) = order.iter().find(|&&i| !paired[i]) {
                let mut m = Match::new(
                    MatchId(self.next_match_id),
                    round_number,
                    matches.len(),
                    Slot::Player(self.players[bye_idx].name.clone()),
                    Slot::Bye,
                );
                self.next_match_id += 1;
                m.score1 = Some(1);
                m.score2 = Some(0);
                m.winner = Some(MatchWinner::Player1);
                m.completed = true;
                matches.push(m);

                let player = &mut self.players[bye_idx];
                player.points += 1.0;
                player.wins += 1;
                log::debug!("swiss round {}: bye awarded to {}", round_number, player.name);
            }
        }

        log::debug!(
            "swiss round {} paired with {} matches",
            round_number,
            matches.len()
        );
        self.rounds.push(Round::new(round_number, matches));
        self.current_round = round_number;
    }

    /// Record a result: updates both players' opponent lists, points and
    /// records, then recomputes every player's Buchholz score from scratch.
    /// No-op for unknown ids and already-completed matches (which covers bye
    /// matches).
    pub fn record_result(&mut self, id: MatchId, score1: u32, score2: u32, winner: MatchWinner) {
        let Some(m) = self
            .rounds
            .iter_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.id == id)
        else {
            return;
        };
        if m.completed {
            return;
        }
        m.score1 = Some(score1);
        m.score2 = Some(score2);
        m.winner = Some(winner);
        m.completed = true;
        let name1 = m.player1.player().map(str::to_owned);
        let name2 = m.player2.player().map(str::to_owned);

        if let (Some(name1), Some(name2)) = (name1, name2) {
            let idx1 = self.players.iter().position(|p| p.name == name1);
            let idx2 = self.players.iter().position(|p| p.name == name2);
            if let (Some(idx1), Some(idx2)) = (idx1, idx2) {
                self.players[idx1].opponents.push(name2);
                self.players[idx2].opponents.push(name1);
                match winner {
                    MatchWinner::Player1 => {
                        self.players[idx1].points += 1.0;
                        self.players[idx1].wins += 1;
                        self.players[idx2].losses += 1;
                    }
                    MatchWinner::Player2 => {
                        self.players[idx2].points += 1.0;
                        self.players[idx2].wins += 1;
                        self.players[idx1].losses += 1;
                    }
                    MatchWinner::Draw => {
                        self.players[idx1].points += 0.5;
                        self.players[idx2].points += 0.5;
                        self.players[idx1].draws += 1;
                        self.players[idx2].draws += 1;
                    }
                }
            }
        }

        self.update_buchholz();
    }

    /// Recompute every player's Buchholz as the sum of their recorded
    /// opponents' current points. Re-derived globally on every call, never
    /// incrementally.
    fn update_buchholz(&mut self) {
        let points: HashMap<String, f64> = self
            .players
            .iter()
            .map(|p| (p.name.clone(), p.points))
            .collect();
        for player in &mut self.players {
            player.buchholz = player
                .opponents
                .iter()
                .filter_map(|o| points.get(o))
                .sum();
        }
    }

    /// Players sorted by points, then Buchholz, then wins, all descending.
    pub fn standings(&self) -> Vec<SwissPlayer> {
        let mut standings = self.players.clone();
        standings.sort_by(|a, b| {
            b.points
                .total_cmp(&a.points)
                .then(b.buchholz.total_cmp(&a.buchholz))
                .then(b.wins.cmp(&a.wins))
        });
        standings
    }

    /// True if every match of the latest round has been played (vacuously
    /// true before the first round).
    pub fn is_round_complete(&self) -> bool {
        match self.rounds.last() {
            Some(round) => round.matches.iter().all(|m| m.completed),
            None => true,
        }
    }

    /// True once the round budget is spent and the last round is finished.
    pub fn is_complete(&self) -> bool {
        self.completed || (self.current_round >= self.total_rounds && self.is_round_complete())
    }
}
