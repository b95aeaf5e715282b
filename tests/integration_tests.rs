//! Integration tests for the session engine

use tile_merger::core::{next_target, GameState};
use tile_merger::types::{CoreEvent, Direction, EngineState, GameAction, Pos, FIRST_TARGET, TICK_MS};

fn pos(row: u8, col: u8) -> Pos {
    Pos::new(row, col).unwrap()
}

/// Tick until the pending move has settled and post-move checks have run.
fn settle(game: &mut GameState) {
    for _ in 0..1000 {
        if !game.move_in_progress() {
            return;
        }
        game.tick(TICK_MS);
    }
    panic!("move never settled");
}

fn select_and_move(game: &mut GameState, at: Pos, dir: Direction) -> bool {
    game.apply_action(GameAction::Select {
        row: at.row(),
        col: at.col(),
    });
    let moved = game.apply_action(GameAction::Move(dir));
    settle(game);
    moved
}

#[test]
fn test_fresh_game() {
    for seed in [1u32, 2, 42, 12345, 0xdead_beef] {
        let game = GameState::new(seed);
        assert_eq!(game.level(), 1);
        assert_eq!(game.current_target(), FIRST_TARGET);
        assert_eq!(game.current_target(), 64);
        assert_eq!(game.state(), EngineState::Playing);
        assert_eq!(game.board().tile_count(), 2);
        for tile in game.board().tiles() {
            assert_eq!(tile.pos().row(), 0, "seed {seed}");
            assert!(matches!(tile.value(), 2 | 4), "seed {seed}");
        }
    }
}

#[test]
fn test_two_unequal_tiles_get_exactly_one_extra() {
    let mut game = GameState::from_layout(3, 128, [[0; 4], [0, 64, 0, 0], [0; 4], [0, 0, 4, 0]]);
    assert!(select_and_move(&mut game, pos(3, 2), Direction::Up));
    assert_eq!(game.board().tile_count(), 3);
    assert_eq!(game.state(), EngineState::Playing);
}

#[test]
fn test_two_unequal_tiles_with_target_reached() {
    // Same safeguard even when the 64 completes the level.
    let mut game = GameState::from_layout(3, 64, [[0; 4], [0, 64, 0, 0], [0; 4], [0, 0, 4, 0]]);
    assert!(select_and_move(&mut game, pos(3, 2), Direction::Left));
    assert_eq!(game.board().tile_count(), 3);
    assert_eq!(game.state(), EngineState::LevelComplete);
    assert_eq!(game.total_score(), 64);
}

#[test]
fn test_merge_to_target_completes_level() {
    let mut game = GameState::from_layout(
        5,
        64,
        [[32, 0, 0, 0], [32, 0, 0, 0], [0, 0, 8, 0], [0, 0, 0, 2]],
    );
    assert!(select_and_move(&mut game, pos(1, 0), Direction::Up));

    assert_eq!(game.board().get(pos(0, 0)).unwrap().value(), 64);
    assert!(game.board().get(pos(0, 0)).unwrap().is_target());
    assert_eq!(game.state(), EngineState::LevelComplete);
    assert_eq!(game.total_score(), 64);
    assert!(game.level_completion_ms().is_some());
    assert_eq!(game.best_time_ms(1), game.level_completion_ms());

    let events = game.take_events();
    assert!(events.contains(&CoreEvent::Merged {
        at: pos(0, 0),
        value: 64
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, CoreEvent::LevelComplete { level: 1, .. })));

    // Repeated checks never change the outcome.
    assert!(game.check_level_completion());
    assert_eq!(game.total_score(), 64);
}

#[test]
fn test_next_target_rule() {
    assert_eq!(next_target(Some(50), 64), 128);
    assert_eq!(next_target(Some(64), 64), 128);
    assert_eq!(next_target(Some(256), 64), 512);
}

#[test]
fn test_advance_after_completion() {
    let mut game = GameState::from_layout(
        5,
        64,
        [[32, 0, 0, 0], [32, 0, 0, 0], [0, 0, 8, 0], [0, 0, 0, 2]],
    );
    select_and_move(&mut game, pos(1, 0), Direction::Up);
    let tiles_before = game.board().tile_count();

    // Only Continue/Advance are accepted now.
    assert!(!game.apply_action(GameAction::SelectNext));
    assert!(!game.apply_action(GameAction::Restart));
    assert!(game.apply_action(GameAction::Continue));

    assert_eq!(game.level(), 2);
    assert_eq!(game.current_target(), 128);
    assert_eq!(game.targets(), &[64, 128]);
    assert_eq!(game.state(), EngineState::Playing);
    assert_eq!(game.level_elapsed_ms(), 0);
    assert_eq!(game.board().tile_count(), tiles_before);
    assert!(game.board().get(pos(0, 0)).unwrap().is_special());
    // Best time of level 1 survives.
    assert!(game.best_time_ms(1).is_some());
    assert!(game.best_time_ms(2).is_none());
}

#[test]
fn test_stuck_board_is_game_over_once() {
    let mut game = GameState::from_layout(
        1,
        4096,
        [[2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]],
    );
    assert!(game.no_moves_left());
    assert!(game.check_game_over());
    assert!(!game.check_game_over());
    assert_eq!(game.state(), EngineState::GameOver);

    let over: Vec<_> = game
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, CoreEvent::GameOver { .. }))
        .collect();
    assert_eq!(over, vec![CoreEvent::GameOver { score: 0 }]);

    // Terminal: only restart is accepted.
    assert!(!game.apply_action(GameAction::Select { row: 0, col: 0 }));
    assert!(!game.apply_action(GameAction::Advance));
    assert!(game.apply_action(GameAction::Continue));
    assert_eq!(game.state(), EngineState::Playing);
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.board().tile_count(), 2);
}

#[test]
fn test_edge_moves_are_rejected() {
    let mut game = GameState::from_layout(1, 64, [[2, 0, 0, 4], [0; 4], [0; 4], [8, 0, 0, 16]]);
    let grid = game.board().value_grid();

    for (at, dir) in [
        (pos(0, 0), Direction::Up),
        (pos(0, 0), Direction::Left),
        (pos(0, 3), Direction::Right),
        (pos(3, 0), Direction::Down),
        (pos(3, 3), Direction::Right),
    ] {
        assert!(!select_and_move(&mut game, at, dir), "{at:?} {dir:?}");
    }
    assert_eq!(game.board().value_grid(), grid);
    assert!(!game.move_in_progress());
}

#[test]
fn test_unequal_merge_rejected() {
    let mut game = GameState::from_layout(1, 64, [[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
    assert!(!select_and_move(&mut game, pos(0, 0), Direction::Right));
    assert_eq!(game.board().tile_count(), 2);
}

#[test]
fn test_pointer_selection_then_move() {
    let mut game = GameState::from_layout(1, 64, [[0; 4], [0, 8, 0, 0], [0, 8, 0, 0], [0, 0, 0, 2]]);
    assert!(game.apply_action(GameAction::Select { row: 2, col: 1 }));
    assert_eq!(game.selected(), Some(pos(2, 1)));

    // Clicking an empty cell clears the selection.
    assert!(!game.apply_action(GameAction::Select { row: 0, col: 0 }));
    assert_eq!(game.selected(), None);
    assert!(!game.apply_action(GameAction::Move(Direction::Up)));

    assert!(select_and_move(&mut game, pos(2, 1), Direction::Up));
    assert_eq!(game.board().get(pos(1, 1)).unwrap().value(), 16);
    assert_eq!(game.selected(), None);
}

#[test]
fn test_level_clock_runs_only_while_playing() {
    let mut game = GameState::from_layout(1, 64, [[32, 32, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2]]);
    game.tick(1500);
    game.tick(500);
    assert_eq!(game.level_elapsed_ms(), 2000);

    select_and_move(&mut game, pos(0, 0), Direction::Right);
    let done = game.level_completion_ms().unwrap();
    game.tick(10_000);
    assert_eq!(game.level_elapsed_ms(), done);
    assert_eq!(game.snapshot().display_time_ms(), done);
}

#[test]
fn test_best_time_recorded_on_completion() {
    let mut game = GameState::from_layout(1, 64, [[32, 32, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2]]);
    game.tick(5000);
    select_and_move(&mut game, pos(0, 0), Direction::Right);

    let ms = game.level_completion_ms().unwrap();
    assert!(ms >= 5000);
    assert_eq!(game.best_time_ms(1), Some(ms));
    assert_eq!(game.snapshot().best_ms, Some(ms));
    assert_eq!(game.best_times().len(), 1);
}

#[test]
fn test_reset_level_action() {
    let mut game = GameState::new(99);
    game.tick(3000);
    assert!(game.apply_action(GameAction::ResetLevel));
    assert_eq!(game.level(), 1);
    assert_eq!(game.level_elapsed_ms(), 0);
    assert_eq!(game.board().tile_count(), 2);
    assert!(game.board().tiles().iter().all(|t| t.pos().row() == 0));
}

#[test]
fn test_same_seed_same_inputs_same_game() {
    let script = [
        GameAction::SelectNext,
        GameAction::Move(Direction::Down),
        GameAction::SelectNext,
        GameAction::Move(Direction::Down),
        GameAction::SelectNext,
        GameAction::Move(Direction::Right),
        GameAction::SelectNext,
        GameAction::Move(Direction::Left),
    ];

    let run = |seed: u32| {
        let mut game = GameState::new(seed);
        for action in script {
            game.apply_action(action);
            settle(&mut game);
        }
        (game.board().value_grid(), game.total_score())
    };
    assert_eq!(run(2024), run(2024));
}
