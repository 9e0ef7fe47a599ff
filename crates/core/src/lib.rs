//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has no dependencies on UI or I/O, making it:
//!
//! - **Deterministic**: the same seed (or piece script) produces the same game
//! - **Testable**: every rule is reachable without a terminal
//! - **Portable**: can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with collision detection and line clearing
//! - [`game_state`]: session state: active/next piece, scoring, fall timing
//! - [`pieces`]: tetromino shapes and clockwise matrix rotation
//! - [`rng`]: piece sources (uniform random, scripted sequence)
//! - [`scoring`]: line-clear points and level progression
//! - [`snapshot`]: read-only copy handed to renderers
//!
//! # Game Rules
//!
//! - **Uniform random pieces**: every kind equally likely on every draw
//! - **Naive rotation**: clockwise only, no wall kicks; blocked turns are rejected
//! - **Immediate lock**: a piece locks on the gravity step that finds it blocked
//! - **Classic scoring**: 100/300/500/800 × level, +1 per soft-drop row
//! - **Levels**: one per 10 lines; each level drops the fall interval by 50ms, down to 100ms
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! assert!(game.apply_action(GameAction::SoftDrop));
//!
//! assert_eq!(game.score(), 1); // Soft drop awards a point
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds; the piece falls one row each time the accumulated
//! time reaches the level's fall interval.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameState, Phase, StepOutcome};
pub use pieces::{canonical_shape, Piece, Shape};
pub use rng::{PieceSource, SequenceSource, SimpleRng, UniformSource};
pub use scoring::{calculate_drop_score, calculate_level, line_clear_points};
pub use snapshot::GameSnapshot;
