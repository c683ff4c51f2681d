//! Integration tests for the killer life/turn state machine.

use cue_tournament::{create_killer_game, TournamentError, TurnResult, DEFAULT_STARTING_LIVES};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{}", i + 1)).collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(23)
}

#[test]
fn creation_shuffles_without_losing_anyone() {
    let players = roster(4);
    let game = create_killer_game(&players, DEFAULT_STARTING_LIVES, &mut rng()).unwrap();
    assert_eq!(game.players.len(), 4);
    assert!(game.players.iter().all(|p| p.lives == 3 && !p.eliminated));

    let mut names: Vec<_> = game.players.iter().map(|p| p.name.clone()).collect();
    names.sort();
    assert_eq!(names, players);
    assert_eq!(game.current_player_index, 0);
    assert!(game.current_player().is_some());
}

#[test]
fn one_miss_each_costs_one_life_each() {
    let mut game = create_killer_game(&roster(4), 3, &mut rng()).unwrap();
    for _ in 0..4 {
        game.process_turn(TurnResult::Miss);
    }
    let stats = game.stats();
    assert_eq!(stats.total_lives, 8); // down exactly 4 from 12
    assert_eq!(stats.eliminated_players, 0);
    assert_eq!(stats.turns_played, 4);
    assert!(!game.game_over);
}

#[test]
fn pot_keeps_lives_and_black_adds_one() {
    let mut game = create_killer_game(&roster(3), 3, &mut rng()).unwrap();
    let first = game.current_player().unwrap().name.clone();
    game.process_turn(TurnResult::Pot);
    game.process_turn(TurnResult::Black);
    let second = game.turn_history[1].player.clone();

    let p1 = game.players.iter().find(|p| p.name == first).unwrap();
    assert_eq!(p1.lives, 3);
    let p2 = game.players.iter().find(|p| p.name == second).unwrap();
    assert_eq!(p2.lives, 4);
    assert_eq!(game.turn_history.len(), 2);
}

#[test]
fn last_player_standing_wins() {
    let mut game = create_killer_game(&roster(4), 3, &mut rng()).unwrap();
    let keeper = game.players[0].name.clone();

    while !game.game_over {
        let current = game.current_player().unwrap().name.clone();
        if current == keeper {
            game.process_turn(TurnResult::Pot);
        } else {
            game.process_turn(TurnResult::Miss);
        }
    }

    assert_eq!(game.winner.as_deref(), Some(keeper.as_str()));
    assert!(game.current_player().is_none());
    let stats = game.stats();
    assert_eq!(stats.active_players, 1);
    assert_eq!(stats.eliminated_players, 3);
    assert_eq!(game.elimination_order().len(), 3);
}

#[test]
fn elimination_order_tracks_who_fell_first() {
    let mut game = create_killer_game(&roster(3), 1, &mut rng()).unwrap();
    let order: Vec<_> = game.players.iter().map(|p| p.name.clone()).collect();

    game.process_turn(TurnResult::Miss); // first player out
    assert!(!game.game_over);
    game.process_turn(TurnResult::Miss); // second player out, game over

    assert!(game.game_over);
    assert_eq!(game.winner.as_deref(), Some(order[2].as_str()));
    assert_eq!(game.elimination_order(), vec![order[0].clone(), order[1].clone()]);

    // History keeps the lives-after trail that backs the ordering.
    assert_eq!(game.turn_history[0].lives_after, 0);
    assert_eq!(game.turn_history[1].lives_after, 0);
}

#[test]
fn turns_skip_eliminated_players() {
    let mut game = create_killer_game(&roster(3), 1, &mut rng()).unwrap();
    let order: Vec<_> = game.players.iter().map(|p| p.name.clone()).collect();

    game.process_turn(TurnResult::Miss); // player 0 eliminated
    assert_eq!(game.current_player().unwrap().name, order[1]);
    game.process_turn(TurnResult::Pot);
    // Player 0 is skipped on the way back around.
    assert_eq!(game.current_player().unwrap().name, order[2]);
}

#[test]
fn finished_games_ignore_further_turns() {
    let mut game = create_killer_game(&roster(2), 1, &mut rng()).unwrap();
    game.process_turn(TurnResult::Miss);
    assert!(game.game_over);
    let before = game.clone();
    game.process_turn(TurnResult::Black);
    assert_eq!(game, before);
}

#[test]
fn rejects_bad_configuration() {
    assert!(matches!(
        create_killer_game(&roster(4), 0, &mut rng()),
        Err(TournamentError::InvalidStartingLives)
    ));
    assert!(matches!(
        create_killer_game(&roster(1), 3, &mut rng()),
        Err(TournamentError::NotEnoughPlayers { .. })
    ));
}
