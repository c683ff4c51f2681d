//! Single-elimination brackets: seeded construction, byes, winner advancement.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formats::seeding::seed_order;
use crate::formats::validate_roster;
use crate::models::{Match, MatchId, MatchWinner, Round, Slot, TournamentError};

/// Smallest power of two that can hold `n` players.
pub fn bracket_size_for(n: usize) -> usize {
    n.next_power_of_two()
}

/// Human label for a round ("Final", "Semifinals", ...).
fn round_name(total_rounds: u32, current_round: u32) -> String {
    match total_rounds - current_round {
        0 => "Final".to_string(),
        1 => "Semifinals".to_string(),
        2 => "Quarterfinals".to_string(),
        _ => format!("Round {}", current_round),
    }
}

/// A full single-elimination round tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Power of two >= player count; byes fill the remainder.
    pub bracket_size: usize,
    pub num_rounds: u32,
    pub rounds: Vec<Round>,
    /// Players in seed order (seed 1 first).
    pub players: Vec<String>,
}

/// Build a bracket from a roster. With `seeded` the input order is used as
/// seed ranks 1..N; otherwise the roster is shuffled with the supplied RNG
/// first. Round-1 matches against a bye auto-complete and their winners are
/// cascaded into round 2.
pub fn generate_single_elimination(
    players: &[String],
    seeded: bool,
    rng: &mut impl Rng,
) -> Result<Bracket, TournamentError> {
    validate_roster(players, 2)?;

    let mut seeded_players = players.to_vec();
    if !seeded {
        seeded_players.shuffle(rng);
    }

    let bracket_size = bracket_size_for(seeded_players.len());
    let num_rounds = bracket_size.trailing_zeros();

    // Map the canonical seed order onto players; seeds past the roster are byes.
    let slots: Vec<Slot> = seed_order(bracket_size)?
        .into_iter()
        .map(|seed| {
            if seed <= seeded_players.len() {
                Slot::Player(seeded_players[seed - 1].clone())
            } else {
                Slot::Bye
            }
        })
        .collect();

    let mut next_id = 1u32;
    let mut rounds: Vec<Round> = Vec::with_capacity(num_rounds as usize);

    let mut first_round = Vec::with_capacity(bracket_size / 2);
    for i in 0..bracket_size / 2 {
        let mut m = Match::new(
            MatchId(next_id),
            1,
            i,
            slots[i * 2].clone(),
            slots[i * 2 + 1].clone(),
        );
        next_id += 1;
        if m.player1.is_bye() {
            m.winner = Some(MatchWinner::Player2);
            m.completed = true;
        } else if m.player2.is_bye() {
            m.winner = Some(MatchWinner::Player1);
            m.completed = true;
        }
        first_round.push(m);
    }
    rounds.push(Round::labeled(1, round_name(num_rounds, 1), first_round));

    for round_num in 2..=num_rounds {
        let count = bracket_size >> round_num;
        let mut matches = Vec::with_capacity(count);
        for i in 0..count {
            let mut m = Match::new(MatchId(next_id), round_num, i, Slot::Open, Slot::Open);
            next_id += 1;
            let prev = &mut rounds[round_num as usize - 2].matches;
            m.source_match1 = Some(prev[i * 2].id);
            m.source_match2 = Some(prev[i * 2 + 1].id);
            prev[i * 2].next_match_id = Some(m.id);
            prev[i * 2 + 1].next_match_id = Some(m.id);
            matches.push(m);
        }
        rounds.push(Round::labeled(
            round_num,
            round_name(num_rounds, round_num),
            matches,
        ));
    }

    let mut bracket = Bracket {
        bracket_size,
        num_rounds,
        rounds,
        players: seeded_players,
    };
    bracket.advance_bye_winners();

    log::debug!(
        "generated single elimination bracket: {} players, size {}, {} rounds",
        bracket.players.len(),
        bracket.bracket_size,
        bracket.num_rounds
    );
    Ok(bracket)
}

impl Bracket {
    fn locate(&self, id: MatchId) -> Option<(usize, usize)> {
        for (ri, round) in self.rounds.iter().enumerate() {
            if let Some(mi) = round.matches.iter().position(|m| m.id == id) {
                return Some((ri, mi));
            }
        }
        None
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        let (ri, mi) = self.locate(id)?;
        Some(&self.rounds[ri].matches[mi])
    }

    /// Record a result and advance the winner into the linked next match.
    ///
    /// No-op when the id is unknown, either side is still unpopulated, the
    /// match is already completed (bye matches complete at construction), or
    /// `winner` is `Draw` (elimination matches cannot draw).
    pub fn update_match(&mut self, id: MatchId, score1: u32, score2: u32, winner: MatchWinner) {
        if winner == MatchWinner::Draw {
            return;
        }
        let Some((ri, mi)) = self.locate(id) else {
            return;
        };
        {
            let m = &mut self.rounds[ri].matches[mi];
            if m.completed || m.player1.is_open() || m.player2.is_open() {
                return;
            }
            m.score1 = Some(score1);
            m.score2 = Some(score2);
            m.winner = Some(winner);
            m.completed = true;
        }

        let m = &self.rounds[ri].matches[mi];
        let position = m.position;
        let next = m.next_match_id;
        let advancing = m.winner_name().map(str::to_owned);
        if let (Some(next_id), Some(name)) = (next, advancing) {
            self.place(next_id, position, Slot::Player(name));
        }
    }

    /// Fill one side of a match: even source positions feed slot 1, odd feed
    /// slot 2.
    fn place(&mut self, id: MatchId, source_position: usize, slot: Slot) {
        if let Some((ri, mi)) = self.locate(id) {
            let m = &mut self.rounds[ri].matches[mi];
            if source_position % 2 == 0 {
                m.player1 = slot;
            } else {
                m.player2 = slot;
            }
        }
    }

    /// Push round-1 bye winners into their round-2 slots.
    fn advance_bye_winners(&mut self) {
        let placements: Vec<(MatchId, usize, String)> = match self.rounds.first() {
            Some(round) => round
                .matches
                .iter()
                .filter_map(|m| {
                    if !m.completed {
                        return None;
                    }
                    let next = m.next_match_id?;
                    let name = m.winner_name()?.to_owned();
                    Some((next, m.position, name))
                })
                .collect(),
            None => Vec::new(),
        };
        for (next_id, position, name) in placements {
            self.place(next_id, position, Slot::Player(name));
        }
    }

    fn final_match(&self) -> Option<&Match> {
        self.rounds.last()?.matches.first()
    }

    /// True once the final has been played.
    pub fn is_complete(&self) -> bool {
        self.final_match().map(|m| m.completed).unwrap_or(false)
    }

    /// Name of the champion, once the final is complete.
    pub fn winner(&self) -> Option<&str> {
        let final_match = self.final_match()?;
        if !final_match.completed {
            return None;
        }
        final_match.winner_name()
    }
}
