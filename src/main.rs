//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `blockfall-term`.
//! Set `BLOCKFALL_LOG=<path>` to write tracing output to a file; `RUST_LOG`
//! selects the filter (default `info`).

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use blockfall::core::{GameSnapshot, GameState};
use blockfall::input::{should_quit, InputHandler};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{GameConfig, TICK_MS};

const LOG_ENV: &str = "BLOCKFALL_LOG";

fn main() -> Result<()> {
    init_logging()?;

    let config = GameConfig::default();
    config.validate().context("invalid game configuration")?;

    let seed = rand::random::<u32>();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, GameState::with_config(config, seed));

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!(error = %err, "failed to restore terminal");
    }
    result
}

/// Log to the file named by `BLOCKFALL_LOG`; without it, logging stays off.
/// Writing to the terminal would corrupt the alternate screen.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.to_string_lossy()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .context("cannot install tracing subscriber")?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, mut game_state: GameState) -> Result<()> {
    let config = game_state.config();
    info!(
        seed = game_state.source().seed(),
        width = config.width,
        height = config.height,
        enhanced_keys = term.enhanced_keys(),
        "starting"
    );

    let view = GameView::default();
    let mut input_handler = InputHandler::new().with_release_events(term.enhanced_keys());

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game_state.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        info!(
                            score = game_state.score(),
                            lines = game_state.lines(),
                            "quit"
                        );
                        return Ok(());
                    }
                    if let Some(action) = input_handler.handle_event(key) {
                        game_state.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for action in input_handler.update(TICK_MS) {
                game_state.apply_action(action);
            }
            game_state.tick(TICK_MS);
        }
    }
}
