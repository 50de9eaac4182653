use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use snake_arena::config::{
    DEFAULT_BOARD_SIZE, DEFAULT_CELL_SIZE, MAX_LEVEL, MIN_LEVEL, SessionConfig,
};
use snake_arena::engine::{Phase, SimulationEngine, TickScheduler};
use snake_arena::grid::Grid;
use snake_arena::input::{self, Direction, GameInput};
use snake_arena::modes::{GameEvent, Mode};
use snake_arena::renderer::{self, FrameInfo};
use snake_arena::score::{FileScoreStore, ScoreTracker};
use snake_arena::terminal_runtime::{TerminalGuard, restore_terminal};
use snake_arena::theme::{ThemeId, palette};

/// How long one input poll blocks; also the frame cadence.
const FRAME_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(
    name = "snake-arena",
    version,
    about = "Grid snake with classic, time-trial and obstacle modes"
)]
struct Cli {
    /// Game mode preselected in the menu.
    #[arg(long, value_enum, default_value = "classic")]
    mode: Mode,

    /// Starting level (1-10); higher is faster.
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// Color theme.
    #[arg(long, value_enum, default_value = "classic")]
    theme: ThemeId,

    /// Board edge length in logical pixels.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: i32,

    /// Cell edge length in logical pixels; must divide the board size.
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: i32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let grid = match Grid::new(cli.board_size, cli.cell_size) {
        Ok(grid) => grid,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let config = SessionConfig {
        mode: cli.mode,
        level: cli.level,
        theme: cli.theme,
    };
    if let Err(error) = config.validate() {
        eprintln!("configuration error: {error}");
        return ExitCode::FAILURE;
    }

    install_panic_hook();

    match run(grid, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("terminal error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(grid: Grid, mut config: SessionConfig) -> io::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut tracker = ScoreTracker::new(FileScoreStore::new());
    let mut engine = SimulationEngine::new(grid);
    let mut scheduler: Option<TickScheduler> = None;
    let mut bonus_flash_at: Option<Instant> = None;
    let mut final_is_new_best = false;
    let mut last_phase = engine.phase();

    loop {
        let now = Instant::now();

        if let Some(active) = scheduler.as_mut() {
            let due = active.poll(now, engine.tick_interval());
            if due.movement {
                engine.tick();
            }
            if due.countdown {
                engine.second();
            }
        }

        for event in engine.take_events() {
            match event {
                GameEvent::TimeBonus { .. } => bonus_flash_at = Some(now),
            }
        }

        if engine.phase() != last_phase {
            if engine.phase() == Phase::GameOver {
                scheduler = None;
                if let Some(session) = engine.session() {
                    final_is_new_best = tracker.record_score(session.mode, session.score);
                }
            }
            last_phase = engine.phase();
        }

        let hud_mode = engine.session().map_or(config.mode, |session| session.mode);
        let ahead_of_best = engine
            .session()
            .is_some_and(|session| tracker.is_ahead_of_best(session.mode, session.score));
        let info = FrameInfo {
            snapshot: engine.snapshot(),
            menu_config: config,
            best_score: tracker.best(hud_mode),
            ahead_of_best,
            theme: palette(config.theme),
            now,
            bonus_flash_at,
            final_is_new_best,
        };
        guard
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &info))?;

        let Some(game_input) = input::poll_input(FRAME_POLL)? else {
            continue;
        };
        if matches!(game_input, GameInput::Quit) {
            break;
        }

        handle_input(
            game_input,
            &mut engine,
            &mut scheduler,
            &mut config,
            &mut bonus_flash_at,
            &mut final_is_new_best,
        )?;
    }

    Ok(())
}

fn handle_input(
    input: GameInput,
    engine: &mut SimulationEngine,
    scheduler: &mut Option<TickScheduler>,
    config: &mut SessionConfig,
    bonus_flash_at: &mut Option<Instant>,
    final_is_new_best: &mut bool,
) -> io::Result<()> {
    match engine.phase() {
        Phase::Menu => match input {
            GameInput::Direction(Direction::Up) => {
                config.level = config.level.saturating_add(1).min(MAX_LEVEL);
            }
            GameInput::Direction(Direction::Down) => {
                config.level = config.level.saturating_sub(1).max(MIN_LEVEL);
            }
            GameInput::Direction(Direction::Right) | GameInput::CycleMode => {
                config.mode = config.mode.next();
            }
            GameInput::Direction(Direction::Left) => config.mode = config.mode.previous(),
            GameInput::CycleTheme => config.theme = config.theme.next(),
            GameInput::Confirm => {
                start_session(engine, scheduler, config, bonus_flash_at, final_is_new_best)?;
            }
            _ => {}
        },
        Phase::Playing => match input {
            GameInput::Direction(direction) => engine.steer(direction),
            GameInput::Pause => {
                engine.toggle_pause();
                if let Some(active) = scheduler.as_mut() {
                    active.pause(Instant::now());
                }
            }
            GameInput::CycleTheme => config.theme = config.theme.next(),
            _ => {}
        },
        Phase::Paused => match input {
            GameInput::Pause | GameInput::Confirm => {
                engine.toggle_pause();
                if let Some(active) = scheduler.as_mut() {
                    active.resume(Instant::now());
                }
            }
            _ => {}
        },
        Phase::GameOver => match input {
            GameInput::Confirm => {
                start_session(engine, scheduler, config, bonus_flash_at, final_is_new_best)?;
            }
            GameInput::CycleMode => engine.back_to_menu(),
            _ => {}
        },
    }

    Ok(())
}

fn start_session(
    engine: &mut SimulationEngine,
    scheduler: &mut Option<TickScheduler>,
    config: &SessionConfig,
    bonus_flash_at: &mut Option<Instant>,
    final_is_new_best: &mut bool,
) -> io::Result<()> {
    engine.start_game(config).map_err(io::Error::other)?;
    *scheduler = Some(TickScheduler::start(
        Instant::now(),
        engine.tick_interval(),
        engine.has_countdown(),
    ));
    *bonus_flash_at = None;
    *final_is_new_best = false;
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
