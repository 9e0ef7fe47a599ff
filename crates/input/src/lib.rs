//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and provides a key-repeat handler
//! suitable for terminal environments (including terminals without
//! key-release events).

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::InputHandler;
pub use map::{action_for_code, handle_key_event, should_quit};
