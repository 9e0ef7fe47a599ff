//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! Everything here is plain data, usable from the simulation core, the input
//! layer and the terminal renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: horizontally centered, `y = 0`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed frame interval (~60 FPS) |
//! | `BASE_FALL_MS` | 500 | Automatic drop interval at level 1 |
//! | `FALL_STEP_MS` | 50 | Speed-up per level |
//! | `MIN_FALL_MS` | 100 | Fastest automatic drop interval |
//! | `INITIAL_REPEAT_DELAY_MS` | 200 | Held key: delay before the first repeat |
//! | `REPEAT_DELAY_MS` | 150 | Held key: delay between later repeats |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, GameConfig, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! let action = GameAction::from_str("softDrop").unwrap();
//! assert_eq!(action, GameAction::SoftDrop);
//!
//! let config = GameConfig::default();
//! assert_eq!((config.width, config.height), (BOARD_WIDTH, BOARD_HEIGHT));
//! assert_eq!(config.fall_speed_ms(1), 500);
//! ```

use thiserror::Error;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u16 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Largest board edge accepted by [`GameConfig::validate`].
pub const MAX_BOARD_DIM: u16 = 64;

/// Widest canonical piece (the I piece).
pub const MAX_PIECE_WIDTH: u16 = 4;

/// Fixed frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Automatic drop interval at level 1.
pub const BASE_FALL_MS: u32 = 500;

/// Drop interval reduction per level.
pub const FALL_STEP_MS: u32 = 50;

/// Floor of the drop interval curve.
pub const MIN_FALL_MS: u32 = 100;

/// Points per successful manual soft-drop step.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Held key: delay between the initial press and the first repeat.
pub const INITIAL_REPEAT_DELAY_MS: u32 = 200;

/// Held key: delay between later repeats.
pub const REPEAT_DELAY_MS: u32 = 150;

/// Line clear scoring table (classic scoring).
///
/// Index `n - 1` holds the base points for clearing `n` lines at once.
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 4] = [100, 300, 500, 800];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_timing_defaults() {
        assert_eq!(BASE_FALL_MS, 500);
        assert_eq!(FALL_STEP_MS, 50);
        assert_eq!(MIN_FALL_MS, 100);
        assert_eq!(INITIAL_REPEAT_DELAY_MS, 200);
        assert_eq!(REPEAT_DELAY_MS, 150);
        assert_eq!(LINE_SCORES, [100, 300, 500, 800]);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn narrow_board_is_rejected() {
        let config = GameConfig::default().with_board_size(3, 20);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooNarrow { width: 3, min: 4 })
        );
    }

    #[test]
    fn oversized_board_is_rejected() {
        let config = GameConfig::default().with_board_size(10, 65);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooLarge {
                width: 10,
                height: 65,
                max: MAX_BOARD_DIM
            })
        );
    }

    #[test]
    fn min_fall_must_not_exceed_base() {
        let config = GameConfig {
            min_fall_ms: 600,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidFallTiming {
                base_ms: 500,
                min_ms: 600
            })
        );
    }

    #[test]
    fn fall_speed_curve_is_clamped() {
        let config = GameConfig::default();
        assert_eq!(config.fall_speed_ms(1), 500);
        assert_eq!(config.fall_speed_ms(2), 450);
        assert_eq!(config.fall_speed_ms(9), 100);
        assert_eq!(config.fall_speed_ms(10), 100);
        assert_eq!(config.fall_speed_ms(500), 100);
    }
}

/// The seven tetromino piece kinds
///
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in a fixed order (used for uniform selection).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Commands the simulation accepts.
///
/// Produced by the input layer; `Quit` is handled by the binary and never
/// reaches the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (awards soft drop points)
    SoftDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Discard the session and start over
    Restart,
}

impl GameAction {
    /// Parse action from a camelCase (or any-case) name
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::Restart => "restart",
        }
    }

    /// Whether holding the key keeps producing this action.
    ///
    /// Rotation and restart are edge-triggered: they fire once per key press.
    pub fn repeats_while_held(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft | GameAction::MoveRight | GameAction::SoftDrop
        )
    }
}

/// Whether a key event is the initial press or the key still being held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    /// Key just went down.
    Down,
    /// Key is held (terminal auto-repeat or a repeated press report).
    Held,
}

/// Emitted after a piece locks into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub points: u32,
    /// Whether the promoted piece could not spawn.
    pub topped_out: bool,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Filled; the kind identifies the color
pub type Cell = Option<PieceKind>;

/// Rejected [`GameConfig`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {width} is too narrow, need at least {min} columns")]
    BoardTooNarrow { width: u16, min: u16 },
    #[error("board height {height} is too short, need at least {min} rows")]
    BoardTooShort { height: u16, min: u16 },
    #[error("board {width}x{height} exceeds the {max}x{max} limit")]
    BoardTooLarge { width: u16, height: u16, max: u16 },
    #[error("fall timing invalid: base {base_ms}ms must be >= minimum {min_ms}ms and minimum must be non-zero")]
    InvalidFallTiming { base_ms: u32, min_ms: u32 },
}

/// Tunable rules of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// Drop interval at level 1.
    pub base_fall_ms: u32,
    /// Drop interval reduction per level.
    pub fall_step_ms: u32,
    /// Drop interval floor.
    pub min_fall_ms: u32,
    pub soft_drop_points: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            base_fall_ms: BASE_FALL_MS,
            fall_step_ms: FALL_STEP_MS,
            min_fall_ms: MIN_FALL_MS,
            soft_drop_points: SOFT_DROP_POINTS,
        }
    }
}

impl GameConfig {
    pub fn with_board_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check the configuration can host a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width > MAX_BOARD_DIM || self.height > MAX_BOARD_DIM {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_DIM,
            });
        }
        if self.width < MAX_PIECE_WIDTH {
            return Err(ConfigError::BoardTooNarrow {
                width: self.width,
                min: MAX_PIECE_WIDTH,
            });
        }
        // Two rows: the tallest spawn orientation.
        if self.height < 2 {
            return Err(ConfigError::BoardTooShort {
                height: self.height,
                min: 2,
            });
        }
        if self.min_fall_ms == 0 || self.min_fall_ms > self.base_fall_ms {
            return Err(ConfigError::InvalidFallTiming {
                base_ms: self.base_fall_ms,
                min_ms: self.min_fall_ms,
            });
        }
        Ok(())
    }

    /// Automatic drop interval for a level (1-based), clamped at the floor.
    pub fn fall_speed_ms(&self, level: u32) -> u32 {
        let speedup = level.saturating_sub(1).saturating_mul(self.fall_step_ms);
        self.base_fall_ms
            .saturating_sub(speedup)
            .max(self.min_fall_ms)
    }
}
