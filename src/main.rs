use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use neon_snake::config::{Palette, Settings};
use neon_snake::engine::{SnakeEngine, StepOutcome};
use neon_snake::error::{ConfigError, EngineError, LogError};
use neon_snake::input::{GameInput, InputHandler};
use neon_snake::logging::{init_file_logging, DEFAULT_LOG_FILTER};
use neon_snake::renderer;
use neon_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(name = "neon-snake", version, about = "Snake in the terminal")]
struct Cli {
    /// JSON settings file (screen geometry and engine tuning).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Append logs to this file. Logging is off without it.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log filter directives, e.g. `debug` or `neon_snake=trace`.
    #[arg(long = "log-level", default_value = DEFAULT_LOG_FILTER)]
    log_level: String,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Log(#[from] LogError),
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path, &cli.log_level)?;
    }

    install_panic_hook();
    run(&cli)
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = settings.engine_config().map_err(ConfigError::from)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, grid = ?config.grid, "starting");
    let mut engine = SnakeEngine::with_seed(config, seed)?;

    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let palette = Palette::default();
    let mut paused = false;
    let mut next_tick = Instant::now() + engine.tick_interval();

    loop {
        let snapshot = engine.snapshot();
        session.draw(|frame| renderer::render(frame, &snapshot, &palette, paused))?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if let Some(game_input) = input.poll_input(timeout)? {
            if handle_input(&mut engine, &mut paused, game_input)?.is_break() {
                break;
            }
        }

        if Instant::now() < next_tick {
            continue;
        }

        if !paused {
            match engine.step() {
                Ok(StepOutcome::Collided(collision)) => {
                    debug!(?collision, "step ended the game");
                }
                Ok(_) => {}
                Err(fault) => error!(%fault, "engine halted"),
            }
        }
        next_tick = Instant::now() + engine.tick_interval();
    }

    info!(score = engine.score(), "quitting");
    Ok(())
}

/// Applies one input signal. Restart revives only a finished game; pause and
/// directions apply only while it runs.
fn handle_input(
    engine: &mut SnakeEngine,
    paused: &mut bool,
    input: GameInput,
) -> Result<ControlFlow<()>, EngineError> {
    match input {
        GameInput::Quit => return Ok(ControlFlow::Break(())),
        GameInput::Restart if !engine.is_alive() => {
            engine.reset()?;
            *paused = false;
        }
        GameInput::Restart => {}
        GameInput::Pause if engine.is_alive() => *paused = !*paused,
        GameInput::Pause => {}
        GameInput::Direction(direction) if !*paused => engine.submit_direction(direction),
        GameInput::Direction(_) => {}
    }

    Ok(ControlFlow::Continue(()))
}

#[cfg(test)]
mod tests {
    use neon_snake::config::EngineConfig;
    use neon_snake::engine::SnakeEngine;
    use neon_snake::input::{Direction, GameInput};

    use super::handle_input;

    fn engine() -> SnakeEngine {
        SnakeEngine::with_seed(EngineConfig::with_grid(10, 10), 1).expect("config should be valid")
    }

    #[test]
    fn quit_breaks_the_loop() {
        let mut engine = engine();
        let mut paused = false;

        let flow = handle_input(&mut engine, &mut paused, GameInput::Quit).expect("no fault");
        assert!(flow.is_break());
    }

    #[test]
    fn directions_are_dropped_while_paused() {
        let mut engine = engine();
        let mut paused = false;

        handle_input(&mut engine, &mut paused, GameInput::Pause).expect("no fault");
        assert!(paused);

        handle_input(&mut engine, &mut paused, GameInput::Direction(Direction::Up))
            .expect("no fault");
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn restart_only_revives_a_finished_game() {
        let mut engine = engine();
        let mut paused = false;

        engine.step().expect("no fault");
        handle_input(&mut engine, &mut paused, GameInput::Restart).expect("no fault");
        assert_eq!(engine.snapshot().ticks, 1);

        while engine.is_alive() {
            engine.step().expect("no fault");
        }
        handle_input(&mut engine, &mut paused, GameInput::Restart).expect("no fault");
        assert!(engine.is_alive());
        assert_eq!(engine.snapshot().ticks, 0);
    }
}
