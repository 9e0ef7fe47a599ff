//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, piece source
//! and scoring. It handles fall timing, piece movement, rotation, locking,
//! line clears and the game lifecycle.
//!
//! Lifecycle:
//!
//! ```text
//!            step_down blocked
//!   Active ───────────────────▶ (lock, clear rows, score, promote next)
//!     ▲                                   │
//!     │ restart          spawn collides   ▼
//!   GameOver ◀──────────────────────── Active
//! ```

use std::mem;

use tracing::{debug, info};

use crate::board::Board;
use crate::pieces::Piece;
use crate::rng::{PieceSource, UniformSource};
use crate::scoring::{calculate_drop_score, calculate_level, line_clear_points};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, GameConfig, LockEvent};

/// Externally visible game phase.
///
/// Locking is not a resting phase: it starts and finishes inside the gravity
/// step that found the piece blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    GameOver,
}

/// Result of one gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Game over; nothing happened.
    Idle,
    /// Piece moved down one row.
    Fell,
    /// Piece locked and the next piece spawned.
    Locked { lines_cleared: u32 },
    /// Piece locked and the next piece had no room to spawn.
    ToppedOut,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<S = UniformSource> {
    config: GameConfig,
    board: Board,
    source: S,
    active: Piece,
    next: Piece,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    score: u32,
    level: u32,
    lines: u32,
    fall_speed_ms: u32,
    fall_timer_ms: u32,
    game_over: bool,
}

impl GameState<UniformSource> {
    /// Create a new standard game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_config(GameConfig::default(), seed)
    }

    pub fn with_config(config: GameConfig, seed: u32) -> Self {
        Self::with_source(config, UniformSource::new(seed))
    }
}

impl<S: PieceSource> GameState<S> {
    /// Create a game drawing piece kinds from `source`.
    pub fn with_source(config: GameConfig, source: S) -> Self {
        let board = Board::new(config.width, config.height);
        Self::with_board(config, board, source)
    }

    /// Create a game on a prepared board.
    ///
    /// The board's dimensions take precedence over the config's. If the first
    /// piece has no room the game starts over.
    pub fn with_board(config: GameConfig, board: Board, mut source: S) -> Self {
        let config = config.with_board_size(board.width(), board.height());
        let active = Piece::spawn(source.next_kind(), config.width);
        let next = Piece::spawn(source.next_kind(), config.width);
        let game_over = board.collides(&active.shape, active.x, active.y);

        Self {
            config,
            board,
            source,
            active,
            next,
            episode_id: 0,
            last_event: None,
            score: 0,
            level: 1,
            lines: 0,
            fall_speed_ms: config.fall_speed_ms(1),
            fall_timer_ms: 0,
            game_over,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The current piece. After game over this is the piece that failed to
    /// spawn.
    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Current automatic drop interval.
    pub fn fall_speed_ms(&self) -> u32 {
        self.fall_speed_ms
    }

    /// Time accumulated towards the next automatic drop.
    pub fn fall_timer_ms(&self) -> u32 {
        self.fall_timer_ms
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::Active
        }
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board.copy_from(&self.board);
        out.active = (!self.game_over).then_some(self.active);
        out.next = self.next;
        out.episode_id = self.episode_id;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.fall_speed_ms = self.fall_speed_ms;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Draw a new piece from the source, centered at the top of the board.
    pub fn spawn_piece(&mut self) -> Piece {
        Piece::spawn(self.source.next_kind(), self.board.width())
    }

    fn fits(&self, piece: &Piece) -> bool {
        !self.board.collides(&piece.shape, piece.x, piece.y)
    }

    /// Try to move the active piece; a blocked move changes nothing.
    pub fn try_move(&mut self, dx: i16, dy: i16) -> bool {
        if self.game_over {
            return false;
        }

        let moved = self.active.moved(dx, dy);
        if !self.fits(&moved) {
            return false;
        }
        self.active = moved;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Manual one-row drop. Awards soft drop points when the piece moved; a
    /// blocked soft drop neither scores nor locks.
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.score = self
                .score
                .saturating_add(calculate_drop_score(1, self.config.soft_drop_points));
        }
        moved
    }

    /// Rotate clockwise in place. Rejected if the turned shape collides at the
    /// current anchor.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }

        let rotated = self.active.rotated();
        if !self.fits(&rotated) {
            return false;
        }
        self.active = rotated;
        true
    }

    /// One gravity step: fall one row, or lock when blocked.
    pub fn step_down(&mut self) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Idle;
        }

        if self.try_move(0, 1) {
            return StepOutcome::Fell;
        }

        self.lock_piece()
    }

    /// Lock the active piece onto the board, clear rows, score, and promote
    /// the next piece.
    fn lock_piece(&mut self) -> StepOutcome {
        let active = self.active;
        self.board
            .lock(&active.shape, active.x, active.y, active.kind);

        let lines_cleared = self.board.clear_completed_rows() as u32;
        let points = if lines_cleared > 0 {
            self.award_lines(lines_cleared)
        } else {
            0
        };

        self.fall_timer_ms = 0;

        let fresh = self.spawn_piece();
        self.active = mem::replace(&mut self.next, fresh);
        let topped_out = !self.fits(&self.active);

        debug!(
            kind = active.kind.as_str(),
            x = active.x,
            y = active.y,
            lines_cleared,
            points,
            "piece locked"
        );

        self.last_event = Some(LockEvent {
            lines_cleared,
            points,
            topped_out,
        });

        if topped_out {
            self.game_over = true;
            info!(
                episode = self.episode_id,
                score = self.score,
                level = self.level,
                lines = self.lines,
                "game over"
            );
            return StepOutcome::ToppedOut;
        }

        StepOutcome::Locked { lines_cleared }
    }

    /// Apply a multi-line clear to score, lines, level and fall speed.
    /// Returns the points awarded.
    fn award_lines(&mut self, lines_cleared: u32) -> u32 {
        let points = match line_clear_points(lines_cleared, self.level) {
            Some(points) => points,
            None => unreachable!(
                "a single lock cleared {} rows; at most four fit in one piece",
                lines_cleared
            ),
        };

        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared);

        let level = calculate_level(self.lines);
        if level != self.level {
            info!(from = self.level, to = level, "level up");
        }
        self.level = level;
        self.fall_speed_ms = self.config.fall_speed_ms(level);

        points
    }

    /// Advance the fall timer; runs a gravity step once a full interval has
    /// accumulated. Returns whether a step ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.game_over {
            return false;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms < self.fall_speed_ms {
            return false;
        }

        self.fall_timer_ms = 0;
        self.step_down();
        true
    }

    /// Throw away the session: empty board, fresh pieces, counters back to
    /// their initial values. The piece source keeps its stream.
    pub fn restart(&mut self) {
        let episode_id = self.episode_id.wrapping_add(1);

        self.board = Board::new(self.config.width, self.config.height);
        self.active = self.spawn_piece();
        self.next = self.spawn_piece();
        self.episode_id = episode_id;
        self.last_event = None;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.fall_speed_ms = self.config.fall_speed_ms(1);
        self.fall_timer_ms = 0;
        self.game_over = false;

        info!(episode = episode_id, "game restarted");
    }

    /// Apply a game action
    ///
    /// Returns whether the state changed. After game over only `Restart` has
    /// an effect.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Check if piece can move in given direction
    pub fn can_move(&self, dx: i16, dy: i16) -> bool {
        !self.game_over && self.fits(&self.active.moved(dx, dy))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
