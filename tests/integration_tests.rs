//! Integration tests for the game loop: actions, gravity, scoring, lifecycle

use crossterm::event::{KeyCode, KeyEventKind};

use blockfall::core::{Board, GameState, PieceSource, Phase, SequenceSource, StepOutcome};
use blockfall::input::InputHandler;
use blockfall::types::{GameAction, GameConfig, LockEvent, PieceKind, BOARD_HEIGHT, TICK_MS};

fn scripted(kinds: &[PieceKind]) -> GameState<SequenceSource> {
    GameState::with_source(GameConfig::default(), SequenceSource::new(kinds.iter().copied()))
}

/// A standard board with `rows` (counted from the bottom) filled except for
/// the given columns.
fn board_with_gaps(rows: usize, gaps: &[usize]) -> Board {
    let empty = ".".repeat(10);
    let mut filled = String::new();
    for x in 0..10 {
        filled.push(if gaps.contains(&x) { '.' } else { '#' });
    }
    let mut lines = vec![empty.as_str(); BOARD_HEIGHT as usize - rows];
    lines.extend(std::iter::repeat(filled.as_str()).take(rows));
    Board::from_pattern(&lines).unwrap()
}

fn drop_until_locked<S: PieceSource>(state: &mut GameState<S>) -> StepOutcome {
    for _ in 0..=BOARD_HEIGHT {
        match state.step_down() {
            StepOutcome::Fell => continue,
            other => return other,
        }
    }
    panic!("piece never locked");
}

#[test]
fn test_game_lifecycle() {
    let state = GameState::new(12345);
    assert_eq!(state.phase(), Phase::Active);
    assert!(!state.game_over());
    assert_eq!(state.score(), 0);
    assert_eq!(state.level(), 1);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.fall_speed_ms(), 500);
    assert_eq!(state.episode_id(), 0);
    assert!(state.board().is_empty());
}

#[test]
fn test_game_actions() {
    let mut state = scripted(&[PieceKind::T]);
    let start = *state.active();

    assert!(state.apply_action(GameAction::MoveLeft));
    assert_eq!(state.active().x, start.x - 1);

    assert!(state.apply_action(GameAction::MoveRight));
    assert!(state.apply_action(GameAction::MoveRight));
    assert_eq!(state.active().x, start.x + 1);

    assert!(state.apply_action(GameAction::Rotate));
    assert_eq!(state.active().shape, start.shape.rotated_cw());

    assert!(state.apply_action(GameAction::SoftDrop));
    assert_eq!(state.active().y, start.y + 1);
    assert_eq!(state.score(), 1);
}

#[test]
fn test_gravity_follows_fall_interval() {
    let mut state = scripted(&[PieceKind::O]);

    assert!(!state.tick(499));
    assert_eq!(state.active().y, 0);
    assert!(state.tick(1));
    assert_eq!(state.active().y, 1);

    // Frame-sized ticks: 32 frames of 16ms reach 512ms.
    let mut steps = 0;
    for _ in 0..32 {
        if state.tick(TICK_MS) {
            steps += 1;
        }
    }
    assert_eq!(steps, 1);
    assert_eq!(state.active().y, 2);
}

#[test]
fn test_piece_locks_on_floor() {
    let mut state = scripted(&[PieceKind::O, PieceKind::T]);

    assert_eq!(drop_until_locked(&mut state), StepOutcome::Locked { lines_cleared: 0 });
    for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
        assert_eq!(state.board().get(x, y), Some(Some(PieceKind::O)));
    }
    assert_eq!(
        state.take_last_event(),
        Some(LockEvent {
            lines_cleared: 0,
            points: 0,
            topped_out: false,
        })
    );
    assert_eq!(state.take_last_event(), None);

    // Next piece was promoted and a new next drawn.
    assert_eq!(state.active().kind, PieceKind::T);
    assert_eq!(state.next().kind, PieceKind::O);
}

#[test]
fn test_blocked_soft_drop_does_not_lock() {
    let mut state = scripted(&[PieceKind::O]);
    while state.soft_drop() {}
    let score = state.score();
    let y = state.active().y;
    assert_eq!(y, 18);
    assert_eq!(score, 18);

    assert!(!state.apply_action(GameAction::SoftDrop));
    assert_eq!(state.score(), score);
    assert_eq!(state.active().y, y);
    assert!(state.board().is_empty());
}

#[test]
fn test_completing_a_row_scores_100_times_level() {
    let board = board_with_gaps(1, &[4, 5]);
    let mut state = GameState::with_board(
        GameConfig::default(),
        board,
        SequenceSource::repeat(PieceKind::O),
    );

    assert_eq!(drop_until_locked(&mut state), StepOutcome::Locked { lines_cleared: 1 });
    assert_eq!(state.score(), 100);
    assert_eq!(state.lines(), 1);

    // The upper half of the O dropped into the bottom row.
    let bottom = state.board().row(19).unwrap();
    let filled: Vec<usize> = (0..10).filter(|&x| bottom[x].is_some()).collect();
    assert_eq!(filled, vec![4, 5]);
    assert!(state.board().row(18).unwrap().iter().all(|c| c.is_none()));
}

#[test]
fn test_double_clear_scores_300() {
    let board = board_with_gaps(2, &[4, 5]);
    let mut state = GameState::with_board(
        GameConfig::default(),
        board,
        SequenceSource::repeat(PieceKind::O),
    );

    assert_eq!(drop_until_locked(&mut state), StepOutcome::Locked { lines_cleared: 2 });
    assert_eq!(state.score(), 300);
    assert!(state.board().is_empty());
}

#[test]
fn test_ten_lines_reach_level_two() {
    // Each vertical I fills column 0 of four nearly full rows.
    let mut state = GameState::with_board(
        GameConfig::default(),
        board_with_gaps(12, &[0]),
        SequenceSource::repeat(PieceKind::I),
    );

    let mut cleared = 0;
    while cleared < 12 {
        assert!(state.rotate());
        while state.move_left() {}
        match drop_until_locked(&mut state) {
            StepOutcome::Locked { lines_cleared } => cleared += lines_cleared,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(state.lines(), 12);
    assert_eq!(state.level(), 2);
    assert_eq!(state.fall_speed_ms(), 450);
    // The level rises only after the third tetris is scored.
    assert_eq!(state.score(), 800 * 3);
}

#[test]
fn test_top_out_then_restart() {
    // A single block under the spawn area stops the first O at the top.
    let mut rows = vec![".........."; BOARD_HEIGHT as usize];
    rows[2] = "....#.....";
    let board = Board::from_pattern(&rows).unwrap();
    let mut state = GameState::with_board(
        GameConfig::default(),
        board,
        SequenceSource::repeat(PieceKind::O),
    );

    assert!(!state.game_over());
    assert_eq!(state.step_down(), StepOutcome::ToppedOut);
    assert!(state.game_over());
    assert_eq!(state.phase(), Phase::GameOver);
    assert!(state.snapshot().active.is_none());
    assert!(state.take_last_event().unwrap().topped_out);

    // Nothing but restart changes the session.
    let frozen = state.board().clone();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::Rotate,
    ] {
        assert!(!state.apply_action(action));
    }
    assert!(!state.tick(10_000));
    assert_eq!(state.step_down(), StepOutcome::Idle);
    assert_eq!(state.board(), &frozen);

    assert!(state.apply_action(GameAction::Restart));
    assert!(!state.game_over());
    assert_eq!(state.episode_id(), 1);
    assert_eq!(state.score(), 0);
    assert_eq!(state.level(), 1);
    assert_eq!(state.lines(), 0);
    assert!(state.board().is_empty());
    assert!(state.snapshot().active.is_some());
}

#[test]
fn test_restart_mid_game_resets_counters() {
    let mut state = GameState::new(7);
    state.soft_drop();
    state.soft_drop();
    assert_eq!(state.score(), 2);

    state.restart();
    assert_eq!(state.score(), 0);
    assert_eq!(state.fall_timer_ms(), 0);
    assert_eq!(state.episode_id(), 1);
    assert_eq!(state.active().y, 0);
}

#[test]
fn test_same_seed_same_pieces() {
    let a = GameState::new(99);
    let b = GameState::new(99);
    assert_eq!(a.active().kind, b.active().kind);
    assert_eq!(a.next().kind, b.next().kind);
    assert_eq!(a.source().seed(), 99);
}

#[test]
fn test_custom_board_size() {
    let config = GameConfig::default().with_board_size(6, 12);
    config.validate().unwrap();
    let state = GameState::with_config(config, 3);
    assert_eq!(state.config(), &config);
    assert_eq!(state.board().width(), 6);
    assert_eq!(state.board().height(), 12);
    assert!(state.active().cells().all(|(x, _)| (0..6).contains(&x)));
}

#[test]
fn test_input_handler_drives_game() {
    let mut input = InputHandler::new().with_key_release_timeout_ms(10_000);
    let mut state = scripted(&[PieceKind::T]);
    let start_x = state.active().x;

    // Immediate move on press.
    let action = input.handle_terminal_key(KeyCode::Left, KeyEventKind::Press);
    assert_eq!(action, Some(GameAction::MoveLeft));
    state.apply_action(GameAction::MoveLeft);
    assert_eq!(state.active().x, start_x - 1);

    // Held: one repeat after 200ms, then every 150ms.
    let mut frames = 0;
    let mut repeats = 0;
    while frames * TICK_MS < 360 {
        for action in input.update(TICK_MS) {
            state.apply_action(action);
            repeats += 1;
        }
        frames += 1;
    }
    assert_eq!(repeats, 2);
    assert_eq!(state.active().x, start_x - 3);

    input.handle_terminal_key(KeyCode::Left, KeyEventKind::Release);
    assert!(input.update(1_000).is_empty());
}

#[test]
fn test_held_rotate_fires_once() {
    let mut input = InputHandler::new().with_key_release_timeout_ms(10_000);
    let mut state = scripted(&[PieceKind::T]);
    let start = state.active().shape;

    for _ in 0..4 {
        if let Some(action) = input.handle_terminal_key(KeyCode::Up, KeyEventKind::Press) {
            state.apply_action(action);
        }
    }
    assert_eq!(state.active().shape, start.rotated_cw());
}
