//! Key-repeat input handler for terminal environments.
//!
//! Moves and soft drop fire once on key down, again after the initial repeat
//! delay, then once per repeat delay while the key stays held. Rotation and
//! restart are edge-triggered: they fire on [`KeyPhase::Down`] only.
//!
//! Terminals that report key event types send `Repeat` and `Release` events
//! and need no guessing. Elsewhere every event is a bare press: OS auto-repeat
//! shows up as presses a few tens of milliseconds apart, and a held key is
//! released by timeout.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::map::{action_for_code, handle_key_event};
use crate::types::{GameAction, KeyPhase, INITIAL_REPEAT_DELAY_MS, REPEAT_DELAY_MS};

// OS auto-repeat reports arrive well inside this window; two deliberate taps
// do not.
const HELD_PRESS_WINDOW_MS: u32 = 50;

/// Tracks input state for key-repeat handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Repeating action whose key is currently held.
    held: Option<GameAction>,
    /// Last pressed key and when it was last reported.
    last_code: Option<KeyCode>,
    last_key_time: Instant,
    repeat_timer: u32,
    /// Delay until the next repeat (initial delay, then repeat delay).
    cooldown: u32,
    initial_delay: u32,
    repeat_delay: u32,
    /// The terminal reports `Repeat`/`Release` events.
    release_events: bool,
    held_press_window_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(INITIAL_REPEAT_DELAY_MS, REPEAT_DELAY_MS)
    }

    /// The auto-release timeout covers the initial delay plus one repeat, so
    /// a held key gets its first timed repeat before it is released.
    pub fn with_config(initial_delay: u32, repeat_delay: u32) -> Self {
        let repeat_delay = repeat_delay.max(1);
        Self {
            held: None,
            last_code: None,
            last_key_time: Instant::now(),
            repeat_timer: 0,
            cooldown: initial_delay,
            initial_delay,
            repeat_delay,
            release_events: false,
            held_press_window_ms: HELD_PRESS_WINDOW_MS,
            key_release_timeout_ms: initial_delay.saturating_add(repeat_delay),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    /// Declare whether the terminal reports key repeat and release events.
    ///
    /// When it does, presses are always fresh and held keys are never
    /// released by timeout.
    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Currently held repeating action, if any.
    pub fn held(&self) -> Option<GameAction> {
        self.held
    }

    fn since_last_key(&self) -> Duration {
        self.last_key_time.elapsed()
    }

    /// Decide whether a terminal key event is a fresh press or a held key.
    ///
    /// Without event types, a press of the same key inside the held-press
    /// window is OS auto-repeat. Release events yield `None`.
    pub fn classify(&self, code: KeyCode, kind: KeyEventKind) -> Option<KeyPhase> {
        match kind {
            KeyEventKind::Release => None,
            KeyEventKind::Repeat => Some(KeyPhase::Held),
            KeyEventKind::Press if self.release_events => Some(KeyPhase::Down),
            KeyEventKind::Press => {
                let recent = self.since_last_key()
                    <= Duration::from_millis(self.held_press_window_ms as u64);
                if self.last_code == Some(code) && recent {
                    Some(KeyPhase::Held)
                } else {
                    Some(KeyPhase::Down)
                }
            }
        }
    }

    /// Feed a key event. Returns the action to apply immediately, if any.
    pub fn handle_key(&mut self, code: KeyCode, phase: KeyPhase) -> Option<GameAction> {
        let action = action_for_code(code)?;
        self.last_code = Some(code);
        self.last_key_time = Instant::now();

        if !action.repeats_while_held() {
            return (phase == KeyPhase::Down).then_some(action);
        }

        if self.held == Some(action) {
            // Timer-driven repeats take over while the key stays down.
            return None;
        }

        self.held = Some(action);
        self.repeat_timer = 0;
        self.cooldown = self.initial_delay;
        Some(action)
    }

    /// Classify and feed a raw terminal key code and event kind.
    pub fn handle_terminal_key(&mut self, code: KeyCode, kind: KeyEventKind) -> Option<GameAction> {
        match self.classify(code, kind) {
            Some(phase) => self.handle_key(code, phase),
            None => {
                self.handle_key_release(code);
                None
            }
        }
    }

    /// Feed a crossterm key event. Modified keys (e.g. Ctrl-R) are not game
    /// input; releases always go through so held keys stop repeating.
    pub fn handle_event(&mut self, key: KeyEvent) -> Option<GameAction> {
        if key.kind != KeyEventKind::Release && handle_key_event(key).is_none() {
            return None;
        }
        self.handle_terminal_key(key.code, key.kind)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if self.last_code == Some(code) {
            self.last_code = None;
        }
        if let Some(action) = action_for_code(code) {
            if self.held == Some(action) {
                self.release();
            }
        }
    }

    fn release(&mut self) {
        self.held = None;
        self.repeat_timer = 0;
        self.cooldown = self.initial_delay;
    }

    /// Advance repeat timers; returns the repeats that came due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        // Auto-release when terminal does not emit release events.
        if !self.release_events && self.held.is_some() {
            let time_since_last_key = self.since_last_key().as_millis() as u32;
            if time_since_last_key > self.key_release_timeout_ms {
                self.release();
            }
        }

        let Some(action) = self.held else {
            return actions;
        };

        self.repeat_timer = self.repeat_timer.saturating_add(elapsed_ms);
        while self.repeat_timer >= self.cooldown {
            let _ = actions.try_push(action);
            self.repeat_timer -= self.cooldown;
            self.cooldown = self.repeat_delay;
        }

        actions
    }

    pub fn reset(&mut self) {
        self.release();
        self.last_code = None;
        self.last_key_time = Instant::now();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
