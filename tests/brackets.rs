//! Integration tests for seeding and the elimination brackets.

use cue_tournament::{
    bracket_size_for, generate_double_elimination, generate_single_elimination, seed_order,
    MatchId, MatchWinner, Slot, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{}", i + 1)).collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn seed_order_for_eight_is_standard() {
    assert_eq!(seed_order(8).unwrap(), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    assert_eq!(seed_order(2).unwrap(), vec![1, 2]);
    assert_eq!(seed_order(4).unwrap(), vec![1, 4, 2, 3]);
}

#[test]
fn seed_order_rejects_bad_sizes() {
    for size in [0, 1, 3, 6, 12] {
        assert!(matches!(
            seed_order(size),
            Err(TournamentError::InvalidBracketSize(s)) if s == size
        ));
    }
}

#[test]
fn bracket_size_is_smallest_power_of_two() {
    for (n, expected) in [(1, 1), (2, 2), (3, 4), (5, 8), (8, 8), (9, 16)] {
        assert_eq!(bracket_size_for(n), expected);
    }
}

#[test]
fn seeded_bracket_never_pairs_two_byes() {
    for n in 2..=17 {
        let bracket = generate_single_elimination(&roster(n), true, &mut rng()).unwrap();
        for m in &bracket.rounds[0].matches {
            assert!(
                !(m.player1.is_bye() && m.player2.is_bye()),
                "bye vs bye with {} players",
                n
            );
        }
    }
}

#[test]
fn five_player_bracket_structure() {
    let bracket = generate_single_elimination(&roster(5), true, &mut rng()).unwrap();
    assert_eq!(bracket.bracket_size, 8);
    assert_eq!(bracket.num_rounds, 3);
    assert_eq!(bracket.rounds.len(), 3);
    for (i, count) in [4, 2, 1].iter().enumerate() {
        assert_eq!(bracket.rounds[i].matches.len(), *count);
    }

    // Top seed meets the bye; the three bye matches complete at construction.
    let first = &bracket.rounds[0].matches;
    assert_eq!(first[0].player1, Slot::Player("P1".into()));
    assert!(first[0].player2.is_bye());
    assert_eq!(first.iter().filter(|m| m.completed).count(), 3);

    // Bye winners cascade into round 2 by source-position parity.
    let second = &bracket.rounds[1].matches;
    assert_eq!(second[0].player1, Slot::Player("P1".into()));
    assert!(second[0].player2.is_open());
    assert_eq!(second[1].player1, Slot::Player("P2".into()));
    assert_eq!(second[1].player2, Slot::Player("P3".into()));
}

#[test]
fn round_labels_follow_distance_to_final() {
    let bracket = generate_single_elimination(&roster(8), true, &mut rng()).unwrap();
    let names: Vec<_> = bracket.rounds.iter().map(|r| r.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            Some("Quarterfinals".to_string()),
            Some("Semifinals".to_string()),
            Some("Final".to_string())
        ]
    );

    let big = generate_single_elimination(&roster(16), true, &mut rng()).unwrap();
    assert_eq!(big.rounds[0].name.as_deref(), Some("Round 1"));
}

#[test]
fn winners_advance_through_the_tree() {
    let mut bracket = generate_single_elimination(&roster(4), true, &mut rng()).unwrap();
    // Seed order 1,4,2,3: match 1 is P1 vs P4, match 2 is P2 vs P3.
    bracket.update_match(MatchId(1), 3, 1, MatchWinner::Player1);
    bracket.update_match(MatchId(2), 0, 3, MatchWinner::Player2);

    let final_match = &bracket.rounds[1].matches[0];
    assert_eq!(final_match.player1, Slot::Player("P1".into()));
    assert_eq!(final_match.player2, Slot::Player("P3".into()));
    assert!(!bracket.is_complete());

    bracket.update_match(MatchId(3), 2, 5, MatchWinner::Player2);
    assert!(bracket.is_complete());
    assert_eq!(bracket.winner(), Some("P3"));
}

#[test]
fn update_is_noop_for_unknown_completed_or_drawn() {
    let mut bracket = generate_single_elimination(&roster(4), true, &mut rng()).unwrap();
    let before = bracket.clone();

    bracket.update_match(MatchId(999), 1, 0, MatchWinner::Player1);
    assert_eq!(bracket, before);

    bracket.update_match(MatchId(1), 1, 0, MatchWinner::Draw);
    assert_eq!(bracket, before);

    // The final's slots are still open; reporting it does nothing.
    bracket.update_match(MatchId(3), 1, 0, MatchWinner::Player1);
    assert_eq!(bracket, before);

    bracket.update_match(MatchId(1), 3, 1, MatchWinner::Player1);
    let decided = bracket.clone();
    bracket.update_match(MatchId(1), 0, 9, MatchWinner::Player2);
    assert_eq!(bracket, decided);
}

#[test]
fn unseeded_construction_is_deterministic_for_a_seeded_rng() {
    let players = roster(6);
    let a = generate_single_elimination(&players, false, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = generate_single_elimination(&players, false, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn rejects_degenerate_rosters() {
    assert!(matches!(
        generate_single_elimination(&roster(1), true, &mut rng()),
        Err(TournamentError::NotEnoughPlayers { required: 2, got: 1 })
    ));
    let dupes = vec!["Alice".to_string(), "alice".to_string()];
    assert!(matches!(
        generate_single_elimination(&dupes, true, &mut rng()),
        Err(TournamentError::DuplicatePlayerName(_))
    ));
}

#[test]
fn double_elimination_structure() {
    let bracket = generate_double_elimination(&roster(8), true, &mut rng()).unwrap();
    assert_eq!(bracket.num_rounds, 3);
    let counts: Vec<_> = bracket.losers.iter().map(|r| r.matches.len()).collect();
    assert_eq!(counts, vec![2, 2, 1, 1]);
    assert!(bracket.grand_final.player1.is_open());
    assert!(bracket.grand_final.player2.is_open());
    assert!(!bracket.is_complete());
}

#[test]
fn four_player_double_elimination_with_bracket_reset() {
    let mut bracket = generate_double_elimination(&roster(4), true, &mut rng()).unwrap();

    // Winners round 1: P1 beats P4, P2 beats P3.
    bracket.update_match(MatchId(1), 2, 0, MatchWinner::Player1);
    bracket.update_match(MatchId(2), 2, 1, MatchWinner::Player1);

    let elim = &bracket.losers[0].matches[0];
    assert_eq!(elim.player1, Slot::Player("P4".into()));
    assert_eq!(elim.player2, Slot::Player("P3".into()));

    // P3 survives the losers bracket; P1 wins the winners final over P2.
    bracket.update_match(MatchId(1000), 1, 3, MatchWinner::Player2);
    bracket.update_match(MatchId(3), 5, 4, MatchWinner::Player1);

    let losers_final = &bracket.losers[1].matches[0];
    assert_eq!(losers_final.player1, Slot::Player("P2".into()));
    assert_eq!(losers_final.player2, Slot::Player("P3".into()));

    bracket.update_match(MatchId(1001), 4, 1, MatchWinner::Player1);
    assert_eq!(bracket.grand_final.player1, Slot::Player("P1".into()));
    assert_eq!(bracket.grand_final.player2, Slot::Player("P2".into()));

    // Losers-side champion takes the first set: bracket reset, one set left.
    bracket.record_grand_final(3, 5, MatchWinner::Player2);
    assert!(bracket.grand_final.needs_reset);
    assert!(!bracket.is_complete());

    bracket.record_grand_final(5, 2, MatchWinner::Player1);
    assert!(bracket.is_complete());
    assert_eq!(bracket.winner(), Some("P1"));
}

#[test]
fn five_player_double_elimination_cascades_byes() {
    let mut bracket = generate_double_elimination(&roster(5), true, &mut rng()).unwrap();

    // Winners round 1 byes (positions 0, 2, 3) drop into the losers bracket;
    // the all-bye losers match resolves immediately.
    assert!(bracket.losers[0].matches[1].completed);
    assert!(bracket.losers[1].matches[1].player2.is_bye());

    // The only real round-1 match: P4 beats P5; P5 clears the losers bye.
    bracket.update_match(MatchId(2), 3, 1, MatchWinner::Player1);
    assert!(bracket.losers[0].matches[0].completed);
    assert_eq!(
        bracket.losers[1].matches[0].player2,
        Slot::Player("P5".into())
    );

    // Winners semifinals: P1 beats P4, P2 beats P3. P3 lands on a bye and
    // advances straight to losers round 3.
    bracket.update_match(MatchId(5), 4, 2, MatchWinner::Player1);
    bracket.update_match(MatchId(6), 4, 3, MatchWinner::Player1);
    assert_eq!(
        bracket.losers[1].matches[0].player1,
        Slot::Player("P4".into())
    );
    assert!(bracket.losers[1].matches[1].completed);
    assert_eq!(
        bracket.losers[2].matches[0].player2,
        Slot::Player("P3".into())
    );

    // Losers side: P5 over P4, then P5 over P3.
    bracket.update_match(MatchId(1002), 1, 3, MatchWinner::Player2);
    bracket.update_match(MatchId(1004), 3, 2, MatchWinner::Player1);

    // Winners final: P1 beats P2; P2 drops to the losers final and wins it.
    bracket.update_match(MatchId(7), 5, 3, MatchWinner::Player1);
    bracket.update_match(MatchId(1005), 4, 2, MatchWinner::Player1);

    assert_eq!(bracket.grand_final.player1, Slot::Player("P1".into()));
    assert_eq!(bracket.grand_final.player2, Slot::Player("P2".into()));

    bracket.record_grand_final(6, 2, MatchWinner::Player1);
    assert!(!bracket.grand_final.needs_reset);
    assert_eq!(bracket.winner(), Some("P1"));
}

#[test]
fn two_player_double_elimination_gives_the_loser_a_second_chance() {
    let mut bracket = generate_double_elimination(&roster(2), true, &mut rng()).unwrap();
    assert!(bracket.losers.is_empty());

    bracket.update_match(MatchId(1), 4, 2, MatchWinner::Player1);
    assert_eq!(bracket.grand_final.player1, Slot::Player("P1".into()));
    assert_eq!(bracket.grand_final.player2, Slot::Player("P2".into()));

    bracket.record_grand_final(1, 4, MatchWinner::Player2);
    assert!(bracket.grand_final.needs_reset);
    assert!(!bracket.is_complete());

    bracket.record_grand_final(2, 4, MatchWinner::Player2);
    assert!(bracket.is_complete());
    assert_eq!(bracket.winner(), Some("P2"));
}
