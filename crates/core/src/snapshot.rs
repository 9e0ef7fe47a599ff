//! Read-only copy of a session for renderers.
//!
//! Renderers never see the live [`GameState`](crate::GameState); they get a
//! snapshot that can be refilled every frame without reallocating.

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::{PieceKind, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    /// Falling piece; `None` once the game is over.
    pub active: Option<Piece>,
    pub next: Piece,
    pub episode_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub fall_speed_ms: u32,
    pub game_over: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: Board::default(),
            active: None,
            next: Piece::spawn(PieceKind::I, BOARD_WIDTH),
            episode_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            fall_speed_ms: crate::types::BASE_FALL_MS,
            game_over: false,
        }
    }
}
