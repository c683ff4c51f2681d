//! Double-elimination brackets: a winners-side tree, a losers bracket fed by
//! winners-side losers, and a grand final with the bracket-reset rule.
//!
//! Losers-bracket topology: round `2k-1` pairs losers-side survivors (round 1
//! pairs the winners-round-1 losers), round `2k` pits those winners against
//! the losers dropping out of winners round `k+1`. The losers-final winner
//! meets the undefeated winners-side champion in the grand final; if the
//! losers-side champion takes the first set, both players stand at one loss
//! and a single decisive set is replayed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formats::bracket::{generate_single_elimination, Bracket};
use crate::models::{Match, MatchId, MatchWinner, Round, Slot, TournamentError};

/// Losers-bracket match ids start here; winners-side ids count from 1.
const LOSERS_ID_BASE: u32 = 1000;

/// The deciding match between the two bracket champions.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrandFinal {
    /// Winners-side champion (undefeated).
    pub player1: Slot,
    /// Losers-side champion.
    pub player2: Slot,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner: Option<MatchWinner>,
    pub completed: bool,
    /// Set when the losers-side champion won the first set and a decisive
    /// set is pending (or was played).
    pub needs_reset: bool,
}

impl GrandFinal {
    fn winner_name(&self) -> Option<&str> {
        match self.winner? {
            MatchWinner::Player1 => self.player1.player(),
            MatchWinner::Player2 => self.player2.player(),
            MatchWinner::Draw => None,
        }
    }
}

/// Full double-elimination state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DoubleBracket {
    pub bracket_size: usize,
    /// Winners-side round count; the losers bracket has `2 * (num_rounds - 1)`.
    pub num_rounds: u32,
    pub winners: Bracket,
    pub losers: Vec<Round>,
    pub grand_final: GrandFinal,
}

/// Build a double-elimination bracket. The winners side is a standard
/// single-elimination tree; losers rounds are allocated up front and bye
/// "losers" from winners round 1 cascade through them immediately.
pub fn generate_double_elimination(
    players: &[String],
    seeded: bool,
    rng: &mut impl Rng,
) -> Result<DoubleBracket, TournamentError> {
    let winners = generate_single_elimination(players, seeded, rng)?;
    let bracket_size = winners.bracket_size;
    let num_rounds = winners.num_rounds;

    let mut losers = Vec::new();
    let mut next_id = LOSERS_ID_BASE;
    let num_losers_rounds = 2 * num_rounds.saturating_sub(1);
    for number in 1..=num_losers_rounds {
        // Rounds 2k-1 and 2k both hold bracket_size / 2^(k+1) matches.
        let k = (number + 1) / 2;
        let count = bracket_size >> (k + 1);
        let matches = (0..count)
            .map(|i| {
                let m = Match::new(MatchId(next_id), number, i, Slot::Open, Slot::Open);
                next_id += 1;
                m
            })
            .collect();
        losers.push(Round::labeled(
            number,
            format!("Losers Round {}", number),
            matches,
        ));
    }

    let mut bracket = DoubleBracket {
        bracket_size,
        num_rounds,
        winners,
        losers,
        grand_final: GrandFinal::default(),
    };

    // Byes auto-completed in winners round 1 have already lost a player-less
    // match; drop those byes into the losers bracket and cascade.
    let bye_drops: Vec<usize> = match bracket.winners.rounds.first() {
        Some(round) => round
            .matches
            .iter()
            .filter(|m| m.completed)
            .map(|m| m.position)
            .collect(),
        None => Vec::new(),
    };
    for position in bye_drops {
        bracket.drop_to_losers(1, position, Slot::Bye);
    }
    bracket.resolve_losers_byes();

    log::debug!(
        "generated double elimination bracket: {} players, size {}, {} losers rounds",
        bracket.players().len(),
        bracket.bracket_size,
        bracket.losers.len()
    );
    Ok(bracket)
}

impl DoubleBracket {
    /// Players in seed order (held by the winners-side tree).
    pub fn players(&self) -> &[String] {
        &self.winners.players
    }

    fn locate_losers(&self, id: MatchId) -> Option<(usize, usize)> {
        for (ri, round) in self.losers.iter().enumerate() {
            if let Some(mi) = round.matches.iter().position(|m| m.id == id) {
                return Some((ri, mi));
            }
        }
        None
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.winners.find_match(id).or_else(|| {
            let (ri, mi) = self.locate_losers(id)?;
            Some(&self.losers[ri].matches[mi])
        })
    }

    /// Record a result on either side of the bracket.
    ///
    /// Winners-side results advance the winner (into the next winners match,
    /// or grand final slot 1 from the winners final) and drop the loser into
    /// the losers bracket. Losers-side results advance the winner toward the
    /// losers final and grand final slot 2. No-op for unknown ids, completed
    /// matches, matches with an unpopulated side, and `Draw`.
    pub fn update_match(&mut self, id: MatchId, score1: u32, score2: u32, winner: MatchWinner) {
        if winner == MatchWinner::Draw {
            return;
        }

        if let Some(m) = self.winners.find_match(id) {
            if m.completed || m.player1.is_open() || m.player2.is_open() {
                return;
            }
            let (wb_round, position) = (m.round, m.position);
            self.winners.update_match(id, score1, score2, winner);

            let Some(m) = self.winners.find_match(id) else {
                return;
            };
            let loser = match m.loser_name() {
                Some(name) => Slot::Player(name.to_owned()),
                None => Slot::Bye,
            };
            if wb_round == self.num_rounds {
                if let Some(name) = m.winner_name() {
                    self.grand_final.player1 = Slot::Player(name.to_owned());
                }
            }
            self.drop_to_losers(wb_round, position, loser);
            self.resolve_losers_byes();
            return;
        }

        let Some((ri, mi)) = self.locate_losers(id) else {
            return;
        };
        {
            let m = &mut self.losers[ri].matches[mi];
            if m.completed || m.player1.is_open() || m.player2.is_open() {
                return;
            }
            m.score1 = Some(score1);
            m.score2 = Some(score2);
            m.winner = Some(winner);
            m.completed = true;
        }
        let m = &self.losers[ri].matches[mi];
        let (lb_round, position) = (m.round, m.position);
        let advancing = match m.winner_name() {
            Some(name) => Slot::Player(name.to_owned()),
            None => Slot::Bye,
        };
        self.advance_losers(lb_round, position, advancing);
        self.resolve_losers_byes();
    }

    /// Record the grand final. A first-set win by the losers-side champion
    /// sets `needs_reset` and reopens the match for one decisive set; the
    /// second result stands either way. No-op until both slots are populated.
    pub fn record_grand_final(&mut self, score1: u32, score2: u32, winner: MatchWinner) {
        if winner == MatchWinner::Draw {
            return;
        }
        let gf = &mut self.grand_final;
        if gf.completed || gf.player1.player().is_none() || gf.player2.player().is_none() {
            return;
        }
        gf.score1 = Some(score1);
        gf.score2 = Some(score2);
        gf.winner = Some(winner);
        gf.completed = true;

        if winner == MatchWinner::Player2 && !gf.needs_reset {
            // The undefeated player has now lost once; the bracket resets.
            gf.needs_reset = true;
            gf.score1 = None;
            gf.score2 = None;
            gf.winner = None;
            gf.completed = false;
            log::debug!("grand final reset: losers-side champion took the first set");
            return;
        }
        if let Some(name) = gf.winner_name() {
            log::info!("double elimination bracket won by {}", name);
        }
    }

    /// Where a winners-round loser enters the losers bracket: round-1 losers
    /// pair up (position parity picks the slot), later losers take slot 1 of
    /// losers round `2 * (wb_round - 1)`. A two-player bracket has no losers
    /// rounds; its final's loser goes straight to the grand final.
    fn drop_to_losers(&mut self, wb_round: u32, position: usize, slot: Slot) {
        if self.losers.is_empty() {
            self.grand_final.player2 = slot;
            return;
        }
        let (round_idx, match_idx, to_slot1) = if wb_round == 1 {
            (0, position / 2, position % 2 == 0)
        } else {
            ((2 * (wb_round - 1) - 1) as usize, position, true)
        };
        let m = &mut self.losers[round_idx].matches[match_idx];
        if to_slot1 {
            m.player1 = slot;
        } else {
            m.player2 = slot;
        }
    }

    /// Advance a losers-match winner: odd-round winners wait in slot 2 for
    /// the next winners-side dropper; even-round winners fold into the next
    /// round by position parity; the losers-final winner reaches the grand
    /// final.
    fn advance_losers(&mut self, lb_round: u32, position: usize, slot: Slot) {
        if lb_round as usize == self.losers.len() {
            self.grand_final.player2 = slot;
            return;
        }
        let (match_idx, to_slot1) = if lb_round % 2 == 1 {
            (position, false)
        } else {
            (position / 2, position % 2 == 0)
        };
        let m = &mut self.losers[lb_round as usize].matches[match_idx];
        if to_slot1 {
            m.player1 = slot;
        } else {
            m.player2 = slot;
        }
    }

    /// Auto-complete losers matches that hold a bye once both slots are
    /// populated, advancing the real player (or the bye itself when two byes
    /// meet). Runs to a fixpoint so cascades settle in one call.
    fn resolve_losers_byes(&mut self) {
        loop {
            let mut pending = None;
            'scan: for (ri, round) in self.losers.iter().enumerate() {
                for (mi, m) in round.matches.iter().enumerate() {
                    if !m.completed
                        && !m.player1.is_open()
                        && !m.player2.is_open()
                        && (m.player1.is_bye() || m.player2.is_bye())
                    {
                        pending = Some((ri, mi));
                        break 'scan;
                    }
                }
            }
            let Some((ri, mi)) = pending else {
                break;
            };
            let (lb_round, position, advancing) = {
                let m = &mut self.losers[ri].matches[mi];
                m.winner = Some(if m.player1.is_bye() {
                    MatchWinner::Player2
                } else {
                    MatchWinner::Player1
                });
                m.completed = true;
                let advancing = match m.winner_name() {
                    Some(name) => Slot::Player(name.to_owned()),
                    None => Slot::Bye,
                };
                (m.round, m.position, advancing)
            };
            self.advance_losers(lb_round, position, advancing);
        }
    }

    /// True once the grand final (including any reset set) has been decided.
    pub fn is_complete(&self) -> bool {
        self.grand_final.completed
    }

    /// Name of the champion.
    pub fn winner(&self) -> Option<&str> {
        if !self.grand_final.completed {
            return None;
        }
        self.grand_final.winner_name()
    }
}
