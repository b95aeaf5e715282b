//! Terminal tile-merger runner (default binary).
//!
//! crossterm for input, the framebuffer renderer for output. The engine is
//! ticked with real elapsed time so the level clock and animations follow the
//! wall clock even when frames are late.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};

use tile_merger::core::{GameSnapshot, GameState};
use tile_merger::input::{handle_key_event, pointer_press, should_quit};
use tile_merger::term::{format_hms, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tile_merger::types::{CoreEvent, GameAction, TICK_MS};
use tile_merger::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;
    info!(
        "starting: seed {}, tile {}x{}",
        config.seed, config.cell_w, config.cell_h
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The terminal owns stdout, so logs only go to a file when one is named.
fn init_logging(config: &AppConfig) -> Result<()> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {path}"))?;
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("initialising logger")?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut game = GameState::new(config.seed);
    let view = GameView::new(config.cell_w, config.cell_h);

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut viewport = term.viewport().unwrap_or(Viewport::new(80, 24));

    let frame = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snap);
        view.render_into(&snap, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!("quit at level {}, score {}", game.level(), game.total_score());
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply(&mut game, action);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(pos) =
                        pointer_press(mouse).and_then(|(x, y)| view.cell_at(viewport, x, y))
                    {
                        apply(
                            &mut game,
                            GameAction::Select {
                                row: pos.row(),
                                col: pos.col(),
                            },
                        );
                    }
                }
                Event::Resize(w, h) => {
                    viewport = Viewport::new(w, h);
                    term.invalidate();
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            let ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            game.tick(ms);
            log_events(&mut game);
        }
    }
}

fn apply(game: &mut GameState, action: GameAction) {
    if !game.apply_action(action) {
        debug!("{} rejected in {}", action.as_str(), game.state().as_str());
    }
    log_events(game);
}

fn log_events(game: &mut GameState) {
    for event in game.take_events() {
        match event {
            CoreEvent::LevelComplete {
                level,
                elapsed_ms,
                best_ms,
            } => info!(
                "level {} complete in {} (best {}), score {}",
                level,
                format_hms(elapsed_ms),
                format_hms(best_ms),
                game.total_score()
            ),
            CoreEvent::LevelStarted { level, target } => {
                info!("level {} started, target {}", level, target)
            }
            CoreEvent::GameOver { score } => info!("game over, final score {}", score),
            other => debug!("{:?}", other),
        }
    }
}
