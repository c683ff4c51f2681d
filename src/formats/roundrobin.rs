//! Round robin: circle-method scheduling and standings aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::formats::validate_roster;
use crate::models::{Match, MatchId, MatchWinner, Round, Slot, TournamentError};

/// A complete round-robin schedule: every pair of players meets exactly once.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub players: Vec<String>,
    pub rounds: Vec<Round>,
}

/// Per-player aggregate over completed matches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub player: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub point_diff: i64,
}

/// Build the schedule with the circle method: one participant stays fixed,
/// the rest rotate one step per round. Odd rosters get a phantom participant
/// whose pairings are dropped, so each real player sits out once.
///
/// Fewer than two players yields an empty schedule.
pub fn generate_round_robin(players: &[String]) -> Result<Schedule, TournamentError> {
    validate_roster(players, 0)?;
    if players.len() < 2 {
        return Ok(Schedule {
            players: players.to_vec(),
            rounds: Vec::new(),
        });
    }

    let mut participants: Vec<Option<String>> = players.iter().cloned().map(Some).collect();
    if participants.len() % 2 == 1 {
        participants.push(None);
    }
    let num_rounds = participants.len() - 1;
    let half = participants.len() / 2;

    let fixed = participants[0].clone();
    let mut rotating: Vec<Option<String>> = participants[1..].to_vec();

    let mut next_id = 1u32;
    let mut rounds = Vec::with_capacity(num_rounds);
    for round in 0..num_rounds {
        let number = round as u32 + 1;
        let mut matches = Vec::new();

        let mut pairs: Vec<(&Option<String>, &Option<String>)> = vec![(&fixed, &rotating[0])];
        for i in 1..half {
            pairs.push((&rotating[i], &rotating[rotating.len() - i]));
        }

        for (a, b) in pairs {
            if let (Some(p1), Some(p2)) = (a, b) {
                matches.push(Match::new(
                    MatchId(next_id),
                    number,
                    matches.len(),
                    Slot::Player(p1.clone()),
                    Slot::Player(p2.clone()),
                ));
                next_id += 1;
            }
        }
        rounds.push(Round::new(number, matches));

        // Rotate: move the last participant to the front.
        if let Some(last) = rotating.pop() {
            rotating.insert(0, last);
        }
    }

    log::debug!(
        "generated round robin schedule: {} players, {} rounds, {} matches",
        players.len(),
        rounds.len(),
        rounds.iter().map(|r| r.matches.len()).sum::<usize>()
    );
    Ok(Schedule {
        players: players.to_vec(),
        rounds,
    })
}

impl Schedule {
    /// All matches across rounds, in schedule order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }

    /// Record a result. No-op for unknown ids and already-completed matches.
    /// Draws are allowed.
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
    }

    /// True once every scheduled match has been played.
    pub fn is_complete(&self) -> bool {
        let mut matches = self.matches().peekable();
        matches.peek().is_some() && matches.all(|m| m.completed)
    }

    /// Aggregate completed matches into a table sorted by wins, then point
    /// differential, then points scored.
    pub fn standings(&self) -> Vec<StandingsEntry> {
        let mut table: Vec<StandingsEntry> = self
            .players
            .iter()
            .map(|player| StandingsEntry {
                player: player.clone(),
                ..StandingsEntry::default()
            })
            .collect();
        let index: HashMap<&str, usize> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        for m in self.matches().filter(|m| m.completed) {
            let score1 = m.score1.unwrap_or(0);
            let score2 = m.score2.unwrap_or(0);
            if let Some(&i) = m.player1.player().and_then(|name| index.get(name)) {
                let entry = &mut table[i];
                entry.played += 1;
                entry.points_for += score1;
                entry.points_against += score2;
                match m.winner {
                    Some(MatchWinner::Player1) => entry.wins += 1,
                    Some(MatchWinner::Player2) => entry.losses += 1,
                    _ => {}
                }
            }
            if let Some(&i) = m.player2.player().and_then(|name| index.get(name)) {
                let entry = &mut table[i];
                entry.played += 1;
                entry.points_for += score2;
                entry.points_against += score1;
                match m.winner {
                    Some(MatchWinner::Player2) => entry.wins += 1,
                    Some(MatchWinner::Player1) => entry.losses += 1,
                    _ => {}
                }
            }
        }

        for entry in &mut table {
            entry.point_diff = i64::from(entry.points_for) - i64::from(entry.points_against);
        }
        table.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.point_diff.cmp(&a.point_diff))
                .then(b.points_for.cmp(&a.points_for))
        });
        table
    }

    /// Winner of the (single) meeting between two players, if it has been
    /// played and was not a draw.
    pub fn head_to_head(&self, player1: &str, player2: &str) -> Option<&str> {
        let m = self
            .matches()
            .find(|m| m.involves(player1) && m.involves(player2))?;
        if !m.completed {
            return None;
        }
        m.winner_name()
    }
}
