//! Authoritative simulation state machine and the tick scheduler.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::collision;
use crate::config::{self, ConfigError, INITIAL_SNAKE_LENGTH, POINTS_PER_FOOD, SessionConfig};
use crate::grid::{Grid, Position};
use crate::input::Direction;
use crate::modes::{self, GameEvent, Mode, ModeRules, TimeTrialClock};
use crate::snake::Snake;
use crate::spawn;

/// High-level engine phase. `Playing` is the only phase in which ticks run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// All mutable state of one play-through. Owned and committed by the engine;
/// mode rules receive it by reference.
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    pub grid: Grid,
    pub snake: Snake,
    pub food: Position,
    pub obstacles: HashSet<Position>,
    pub score: u32,
    pub selected_level: u8,
    pub level: u8,
    pub clock: Option<TimeTrialClock>,
    pub events: Vec<GameEvent>,
    pub spawn_anchor: Position,
}

impl Session {
    /// Base session state before the mode rules and the food allocator run:
    /// a three-segment snake anchored at the board center, no obstacles, and
    /// a placeholder food position.
    #[must_use]
    pub fn fresh(grid: Grid, mode: Mode, selected_level: u8) -> Self {
        let cell = grid.cell_size();
        let mid = grid.cells_per_axis() / 2 * cell;
        let anchor = Position { x: mid, y: mid };

        Self {
            mode,
            grid,
            snake: Snake::spawn(anchor, INITIAL_SNAKE_LENGTH, cell),
            food: Position { x: 0, y: 0 },
            obstacles: HashSet::new(),
            score: 0,
            selected_level,
            level: selected_level,
            clock: None,
            events: Vec::new(),
            spawn_anchor: anchor,
        }
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.clock.map(|clock| clock.remaining_secs)
    }
}

/// Read-only view of one resolved tick, handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub mode: Mode,
    pub grid: Grid,
    pub snake: &'a Snake,
    pub heading: Option<Direction>,
    pub food: Position,
    pub obstacles: &'a HashSet<Position>,
    pub score: u32,
    pub level: u8,
    pub remaining_secs: Option<u32>,
}

/// The simulation engine: owns the session, applies movement, and drives the
/// `Menu -> Playing <-> Paused -> GameOver` state machine.
pub struct SimulationEngine {
    grid: Grid,
    phase: Phase,
    session: Option<Session>,
    rules: Option<Box<dyn ModeRules>>,
    heading: Option<Direction>,
    pending: Option<Direction>,
    direction_changed: bool,
    rng: StdRng,
}

impl SimulationEngine {
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::from_rng(grid, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and reproducible simulations.
    #[must_use]
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self::from_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn from_rng(grid: Grid, rng: StdRng) -> Self {
        Self {
            grid,
            phase: Phase::Menu,
            session: None,
            rules: None,
            heading: None,
            pending: None,
            direction_changed: false,
            rng,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Mutable session access, for collaborators that stage test scenarios.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Whether the active mode runs the independent 1 Hz countdown.
    #[must_use]
    pub fn has_countdown(&self) -> bool {
        self.rules.as_ref().is_some_and(|rules| rules.uses_countdown())
    }

    /// Movement interval for the current level (base level when no session).
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let level = self.session.as_ref().map_or(config::MIN_LEVEL, |s| s.level);
        config::tick_interval_for_level(level)
    }

    /// Starts a new session, replacing any previous one. The mode rules run
    /// first (placing obstacles, arming the clock), then the food allocator,
    /// so food placement sees the final obstacle field.
    pub fn start_game(&mut self, config: &SessionConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let mut session = Session::fresh(self.grid, config.mode, config.level);
        let mut rules = modes::rules_for(config.mode);
        rules.on_start(&mut session, &mut self.rng);
        session.food = spawn::place_food(&mut self.rng, session.grid, &session.snake, &session.obstacles);

        self.session = Some(session);
        self.rules = Some(rules);
        self.heading = None;
        self.pending = None;
        self.direction_changed = false;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Applies one direction intent. At most one change is accepted per tick;
    /// intents repeating the current heading, or reversing it while the snake
    /// is longer than one segment, are no-ops.
    pub fn steer(&mut self, direction: Direction) {
        if self.phase != Phase::Playing || self.direction_changed {
            return;
        }

        if let Some(current) = self.heading {
            if direction == current {
                return;
            }
            let length = self.session.as_ref().map_or(0, |s| s.snake.len());
            if direction == current.opposite() && length > 1 {
                return;
            }
        }

        self.pending = Some(direction);
        self.direction_changed = true;
    }

    /// Toggles pause. Mode pause/resume hooks run symmetrically with the
    /// movement loop so a paused time-trial clock cannot keep draining.
    pub fn toggle_pause(&mut self) {
        let next = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            _ => return,
        };
        self.phase = next;

        let Some(session) = self.session.as_mut() else { return };
        let Some(rules) = self.rules.as_mut() else { return };
        match next {
            Phase::Paused => rules.on_pause(session),
            Phase::Playing => rules.on_resume(session),
            _ => {}
        }
    }

    /// Advances the simulation by one movement tick.
    ///
    /// Order within the tick: re-arm input acceptance, commit the pending
    /// heading, move and wrap the head, grow or drop the tail, then check
    /// collisions against the updated body. A neutral heading (no intent yet)
    /// leaves the snake waiting in place.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.direction_changed = false;

        let Some(session) = self.session.as_mut() else { return };
        let Some(rules) = self.rules.as_mut() else { return };
        let Some(direction) = self.pending else { return };
        self.heading = Some(direction);

        let (dx, dy) = direction.delta(session.grid.cell_size());
        let head = session.snake.head();
        let next = session.grid.wrap(Position {
            x: head.x + dx,
            y: head.y + dy,
        });

        let ate = next == session.food;
        session.snake.advance(next, ate);

        if ate {
            session.score += POINTS_PER_FOOD;
            session.level = config::level_for_score(session.selected_level, session.score);
            rules.on_food_eaten(session, POINTS_PER_FOOD);
            session.food =
                spawn::place_food(&mut self.rng, session.grid, &session.snake, &session.obstacles);
        }

        if collision::hits_self(next, &session.snake)
            || collision::hits_obstacle(next, &session.obstacles, session.mode)
        {
            self.phase = Phase::GameOver;
            rules.on_end(session);
        }
    }

    /// Advances the 1 Hz countdown by one second. Expiry ends the session.
    pub fn second(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(session) = self.session.as_mut() else { return };
        let Some(rules) = self.rules.as_mut() else { return };

        rules.on_second(session);
        if session.clock.is_some_and(|clock| clock.remaining_secs == 0) {
            self.phase = Phase::GameOver;
            rules.on_end(session);
        }
    }

    /// Drains UI events raised since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.session
            .as_mut()
            .map_or_else(Vec::new, |session| std::mem::take(&mut session.events))
    }

    /// Leaves a finished session and returns to the menu.
    pub fn back_to_menu(&mut self) {
        if self.phase != Phase::GameOver {
            return;
        }
        self.phase = Phase::Menu;
        self.session = None;
        self.rules = None;
        self.heading = None;
        self.pending = None;
        self.direction_changed = false;
    }

    /// Snapshot of the resolved state; `None` while in the menu.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot<'_>> {
        let session = self.session.as_ref()?;
        Some(Snapshot {
            phase: self.phase,
            mode: session.mode,
            grid: session.grid,
            snake: &session.snake,
            heading: self.heading,
            food: session.food,
            obstacles: &session.obstacles,
            score: session.score,
            level: session.level,
            remaining_secs: session.remaining_secs(),
        })
    }
}

/// Work the scheduler reports as due on a poll.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DueWork {
    pub movement: bool,
    pub countdown: bool,
}

/// Two independently cancellable deadlines driven by the single-threaded
/// main loop: the movement tick and, in countdown modes, the 1 Hz clock.
/// Pausing freezes both; resuming shifts them by the paused gap so no missed
/// ticks are replayed.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    next_move: Instant,
    next_second: Option<Instant>,
    paused_at: Option<Instant>,
}

impl TickScheduler {
    #[must_use]
    pub fn start(now: Instant, move_interval: Duration, with_countdown: bool) -> Self {
        Self {
            next_move: now + move_interval,
            next_second: with_countdown.then(|| now + Duration::from_secs(1)),
            paused_at: None,
        }
    }

    /// Reports due work and re-arms the deadlines that fired. The movement
    /// interval is passed on every poll because the level can change between
    /// ticks.
    pub fn poll(&mut self, now: Instant, move_interval: Duration) -> DueWork {
        if self.paused_at.is_some() {
            return DueWork::default();
        }

        let movement = now >= self.next_move;
        if movement {
            self.next_move = now + move_interval;
        }

        let countdown = match self.next_second {
            Some(deadline) if now >= deadline => {
                self.next_second = Some(deadline + Duration::from_secs(1));
                true
            }
            _ => false,
        };

        DueWork { movement, countdown }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            let gap = now.saturating_duration_since(paused_at);
            self.next_move += gap;
            if let Some(deadline) = self.next_second.as_mut() {
                *deadline += gap;
            }
        }
    }

    /// Stops the countdown deadline for the rest of the session.
    pub fn cancel_countdown(&mut self) {
        self.next_second = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{Phase, SimulationEngine, TickScheduler};
    use crate::config::SessionConfig;
    use crate::grid::{Grid, Position};
    use crate::input::Direction;
    use crate::modes::{Mode, TimeTrialClock};
    use crate::snake::Snake;
    use crate::theme::ThemeId;

    fn engine(mode: Mode) -> SimulationEngine {
        let grid = Grid::new(600, 20).expect("600 is a multiple of 20");
        let mut engine = SimulationEngine::with_seed(grid, 42);
        engine
            .start_game(&SessionConfig {
                mode,
                level: 1,
                theme: ThemeId::Classic,
            })
            .expect("valid config");
        engine
    }

    fn stage(engine: &mut SimulationEngine, segments: Vec<Position>, food: Position) {
        let session = engine.session_mut().expect("session is active");
        session.snake = Snake::from_segments(segments);
        session.food = food;
    }

    #[test]
    fn snake_waits_in_place_until_the_first_intent() {
        let mut engine = engine(Mode::Classic);
        let before = engine.session().expect("active").snake.head();

        engine.tick();
        engine.tick();

        assert_eq!(engine.session().expect("active").snake.head(), before);
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn one_tick_moves_the_body_forward_one_cell() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );

        engine.steer(Direction::Right);
        engine.tick();

        let segments: Vec<_> = engine
            .session()
            .expect("active")
            .snake
            .segments()
            .copied()
            .collect();
        assert_eq!(
            segments,
            vec![
                Position { x: 120, y: 100 },
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
            ]
        );
    }

    #[test]
    fn head_wraps_across_the_right_edge() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 580, y: 100 },
                Position { x: 560, y: 100 },
                Position { x: 540, y: 100 },
            ],
            Position { x: 300, y: 300 },
        );

        engine.steer(Direction::Right);
        engine.tick();

        assert_eq!(
            engine.session().expect("active").snake.head(),
            Position { x: 0, y: 100 }
        );
    }

    #[test]
    fn eating_grows_scores_and_respawns_food() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 120, y: 100 },
        );

        engine.steer(Direction::Right);
        engine.tick();

        let session = engine.session().expect("active");
        assert_eq!(session.snake.len(), 4);
        assert_eq!(session.score, 10);
        assert_ne!(session.food, Position { x: 120, y: 100 });
        assert!(!session.snake.occupies(session.food));
    }

    #[test]
    fn level_rises_with_score_but_never_past_ten() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 120, y: 100 },
        );
        let session = engine.session_mut().expect("active");
        session.selected_level = 9;
        session.score = 40;

        engine.steer(Direction::Right);
        engine.tick();

        let session = engine.session().expect("active");
        assert_eq!(session.score, 50);
        assert_eq!(session.level, 10);
    }

    #[test]
    fn reversal_intents_are_ignored() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );

        engine.steer(Direction::Right);
        engine.tick();

        // Left reverses the committed Right heading; the snake keeps going.
        engine.steer(Direction::Left);
        engine.tick();

        assert_eq!(
            engine.session().expect("active").snake.head(),
            Position { x: 140, y: 100 }
        );
        assert_eq!(engine.heading(), Some(Direction::Right));
    }

    #[test]
    fn only_the_first_intent_per_tick_is_accepted() {
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );
        engine.steer(Direction::Right);
        engine.tick();

        engine.steer(Direction::Up);
        engine.steer(Direction::Down); // second change in the same tick
        engine.tick();

        assert_eq!(
            engine.session().expect("active").snake.head(),
            Position { x: 120, y: 80 }
        );
    }

    #[test]
    fn running_into_the_body_ends_the_session() {
        let mut engine = engine(Mode::Classic);
        // Hook shape: moving left from (100,120) into (100,100)..(140,100)
        // then up runs the head into the segment at (100,100)'s column.
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 120 },
                Position { x: 120, y: 120 },
                Position { x: 120, y: 100 },
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );

        engine.steer(Direction::Up);
        engine.tick();

        assert_eq!(engine.phase(), Phase::GameOver);
    }

    #[test]
    fn moving_into_the_vacated_tail_cell_is_safe() {
        // 2x2 loop: the head enters the cell the tail leaves this tick.
        let mut engine = engine(Mode::Classic);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 120, y: 100 },
                Position { x: 120, y: 120 },
                Position { x: 100, y: 120 },
            ],
            Position { x: 500, y: 500 },
        );

        engine.steer(Direction::Down);
        engine.tick();

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(
            engine.session().expect("active").snake.head(),
            Position { x: 100, y: 120 }
        );
    }

    #[test]
    fn hitting_an_obstacle_ends_the_session() {
        let mut engine = engine(Mode::Obstacle);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );
        let session = engine.session_mut().expect("active");
        session.obstacles = [Position { x: 120, y: 100 }].into_iter().collect();

        engine.steer(Direction::Right);
        engine.tick();

        assert_eq!(engine.phase(), Phase::GameOver);
    }

    #[test]
    fn pause_suspends_ticks_and_the_clock() {
        let mut engine = engine(Mode::TimeTrial);
        stage(
            &mut engine,
            vec![
                Position { x: 100, y: 100 },
                Position { x: 80, y: 100 },
                Position { x: 60, y: 100 },
            ],
            Position { x: 500, y: 500 },
        );
        engine.steer(Direction::Right);
        engine.tick();

        engine.toggle_pause();
        assert_eq!(engine.phase(), Phase::Paused);

        let head = engine.session().expect("active").snake.head();
        let secs = engine.session().expect("active").remaining_secs();
        engine.tick();
        engine.second();

        assert_eq!(engine.session().expect("active").snake.head(), head);
        assert_eq!(engine.session().expect("active").remaining_secs(), secs);

        engine.toggle_pause();
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn countdown_expiry_ends_a_time_trial() {
        let mut engine = engine(Mode::TimeTrial);
        engine.session_mut().expect("active").clock = Some(TimeTrialClock {
            remaining_secs: 1,
            running: true,
        });

        engine.second();

        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.session().expect("active").remaining_secs(), Some(0));
    }

    #[test]
    fn back_to_menu_clears_the_session() {
        let mut engine = engine(Mode::TimeTrial);
        engine.session_mut().expect("active").clock = Some(TimeTrialClock {
            remaining_secs: 1,
            running: true,
        });
        engine.second();

        engine.back_to_menu();

        assert_eq!(engine.phase(), Phase::Menu);
        assert!(engine.session().is_none());
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn scheduler_fires_movement_and_countdown_independently() {
        let interval = Duration::from_millis(200);
        let t0 = Instant::now();
        let mut scheduler = TickScheduler::start(t0, interval, true);

        let due = scheduler.poll(t0 + Duration::from_millis(100), interval);
        assert!(!due.movement);
        assert!(!due.countdown);

        let due = scheduler.poll(t0 + Duration::from_millis(250), interval);
        assert!(due.movement);
        assert!(!due.countdown);

        let due = scheduler.poll(t0 + Duration::from_millis(1100), interval);
        assert!(due.movement);
        assert!(due.countdown);
    }

    #[test]
    fn paused_scheduler_reports_nothing_and_resumes_shifted() {
        let interval = Duration::from_millis(200);
        let t0 = Instant::now();
        let mut scheduler = TickScheduler::start(t0, interval, true);

        scheduler.pause(t0 + Duration::from_millis(50));
        let due = scheduler.poll(t0 + Duration::from_secs(10), interval);
        assert_eq!(due, super::DueWork::default());

        // A 10s pause shifts both deadlines by 10s: the movement deadline
        // lands at t0+10.15s, the countdown at t0+11s.
        scheduler.resume(t0 + Duration::from_millis(10_050));
        let due = scheduler.poll(t0 + Duration::from_millis(10_100), interval);
        assert!(!due.movement);
        assert!(!due.countdown);

        let due = scheduler.poll(t0 + Duration::from_millis(10_200), interval);
        assert!(due.movement);
        assert!(!due.countdown);

        let due = scheduler.poll(t0 + Duration::from_millis(11_050), interval);
        assert!(due.countdown);
    }

    #[test]
    fn cancelled_countdown_never_fires() {
        let interval = Duration::from_millis(200);
        let t0 = Instant::now();
        let mut scheduler = TickScheduler::start(t0, interval, true);

        scheduler.cancel_countdown();
        let due = scheduler.poll(t0 + Duration::from_secs(5), interval);
        assert!(due.movement);
        assert!(!due.countdown);
    }
}
