//! Property tests for board and session invariants.
//!
//! Covered:
//! - Out-of-bounds shape cells always collide, whatever the board holds.
//! - Cells above the board ignore occupancy.
//! - Clearing a board without full rows changes nothing.
//! - Four clockwise turns are the identity.
//! - Counters never decrease and level tracks cleared lines over random play.

use proptest::prelude::*;

use blockfall::core::{canonical_shape, Board, GameState, Shape};
use blockfall::types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, TICK_MS};

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0..PieceKind::ALL.len()).prop_map(|i| PieceKind::ALL[i])
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (kind_strategy(), 0..4usize).prop_map(|(kind, turns)| {
        let mut shape = canonical_shape(kind);
        for _ in 0..turns {
            shape = shape.rotated_cw();
        }
        shape
    })
}

/// Random fill of a standard board.
fn board_strategy() -> impl Strategy<Value = Board> {
    proptest::collection::vec(any::<bool>(), (BOARD_WIDTH * BOARD_HEIGHT) as usize).prop_map(
        |bits| {
            let mut board = Board::default();
            for (i, filled) in bits.into_iter().enumerate() {
                if filled {
                    let x = (i % BOARD_WIDTH as usize) as i16;
                    let y = (i / BOARD_WIDTH as usize) as i16;
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board
        },
    )
}

fn action_strategy() -> impl Strategy<Value = GameAction> {
    prop_oneof![
        Just(GameAction::MoveLeft),
        Just(GameAction::MoveRight),
        Just(GameAction::SoftDrop),
        Just(GameAction::Rotate),
    ]
}

fn out_of_bounds(shape: &Shape, x: i16, y: i16) -> bool {
    shape.filled().any(|(r, c)| {
        let bx = x + c as i16;
        let by = y + r as i16;
        bx < 0 || bx >= BOARD_WIDTH as i16 || by >= BOARD_HEIGHT as i16
    })
}

proptest! {
    #[test]
    fn out_of_bounds_cells_always_collide(
        board in board_strategy(),
        shape in shape_strategy(),
        x in -6i16..16,
        y in -6i16..26,
    ) {
        if out_of_bounds(&shape, x, y) {
            prop_assert!(board.collides(&shape, x, y));
        }
    }

    #[test]
    fn cells_above_board_ignore_occupancy(
        board in board_strategy(),
        shape in shape_strategy(),
        x in 0i16..10,
    ) {
        let y = -(shape.rows() as i16);
        let fits_horizontally = x + shape.cols() as i16 <= BOARD_WIDTH as i16;
        prop_assert_eq!(board.collides(&shape, x, y), !fits_horizontally);
    }

    #[test]
    fn clearing_without_full_rows_is_identity(board in board_strategy()) {
        let mut board = board;
        for y in 0..BOARD_HEIGHT as usize {
            if board.is_row_full(y) {
                board.set(0, y as i16, None);
            }
        }
        let before = board.clone();

        prop_assert_eq!(board.clear_completed_rows(), 0);
        prop_assert_eq!(board, before);
    }

    #[test]
    fn clearing_leaves_no_full_rows(board in board_strategy()) {
        let mut board = board;
        let full = (0..BOARD_HEIGHT as usize).filter(|&y| board.is_row_full(y)).count();
        let filled_before = board.cells().iter().filter(|c| c.is_some()).count();

        prop_assert_eq!(board.clear_completed_rows(), full);
        prop_assert!((0..BOARD_HEIGHT as usize).all(|y| !board.is_row_full(y)));
        let filled_after = board.cells().iter().filter(|c| c.is_some()).count();
        prop_assert_eq!(filled_before - filled_after, full * BOARD_WIDTH as usize);
    }

    #[test]
    fn four_rotations_are_identity(shape in shape_strategy()) {
        let back = shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
        prop_assert_eq!(back, shape);
    }

    #[test]
    fn counters_are_monotonic_over_random_play(
        seed in any::<u32>(),
        actions in proptest::collection::vec(action_strategy(), 1..400),
    ) {
        let mut state = GameState::new(seed);
        let (mut score, mut lines, mut level) = (0, 0, 1);

        for action in actions {
            state.apply_action(action);
            state.tick(TICK_MS * 8);

            prop_assert!(state.score() >= score);
            prop_assert!(state.lines() >= lines);
            prop_assert!(state.level() >= level);
            prop_assert_eq!(state.level(), state.lines() / 10 + 1);
            let expected_speed = 500u32.saturating_sub((state.level() - 1) * 50).max(100);
            prop_assert_eq!(state.fall_speed_ms(), expected_speed);

            if let Some(event) = state.take_last_event() {
                prop_assert!(event.lines_cleared <= 4);
                prop_assert_eq!(state.game_over(), event.topped_out);
            }
            if state.game_over() {
                prop_assert!(state.snapshot().active.is_none());
            }

            score = state.score();
            lines = state.lines();
            level = state.level();
        }
    }
}
