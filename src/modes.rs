//! Per-mode rule strategies: initialization, timer behavior, scoring
//! bonuses, and termination side effects.

use clap::ValueEnum;
use rand::rngs::StdRng;

use crate::config::{
    POINTS_PER_LEVEL, TIME_TRIAL_FOOD_BONUS_SECS, TIME_TRIAL_START_SECS,
    TIME_TRIAL_STREAK_BONUS_SECS,
};
use crate::engine::Session;
use crate::spawn;

/// Rule variant, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, ValueEnum)]
pub enum Mode {
    Classic,
    TimeTrial,
    Obstacle,
}

impl Mode {
    /// Display label for menus and the HUD.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::TimeTrial => "Time Trial",
            Self::Obstacle => "Obstacle",
        }
    }

    /// Next mode in menu cycle order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::TimeTrial,
            Self::TimeTrial => Self::Obstacle,
            Self::Obstacle => Self::Classic,
        }
    }

    /// Previous mode in menu cycle order.
    #[must_use]
    pub fn previous(self) -> Self {
        self.next().next()
    }
}

/// One-second countdown state for time-trial sessions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimeTrialClock {
    pub remaining_secs: u32,
    pub running: bool,
}

/// Events surfaced to the UI layer, drained once per frame.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    /// Time-trial streak bonus: extra seconds granted at a cumulative-score
    /// multiple of [`POINTS_PER_LEVEL`].
    TimeBonus { secs: u32 },
}

/// Strategy hooks invoked by the engine at session transitions. The engine
/// owns the session and calls these at well-defined points; rules only touch
/// the mode-specific parts (clock, obstacles, events).
pub trait ModeRules {
    /// Session initialization beyond the base state.
    fn on_start(&mut self, session: &mut Session, rng: &mut StdRng);

    /// One wall-clock second elapsed (countdown modes only).
    fn on_second(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// Food was eaten; the engine has already committed the score.
    fn on_food_eaten(&mut self, session: &mut Session, points_scored: u32) {
        let _ = (session, points_scored);
    }

    /// Session reached a terminal state.
    fn on_end(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// Session was paused; countdown modes must stop their clock.
    fn on_pause(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// Session resumed from pause.
    fn on_resume(&mut self, session: &mut Session) {
        let _ = session;
    }

    /// Whether this mode runs the independent 1 Hz countdown.
    fn uses_countdown(&self) -> bool {
        false
    }
}

/// Builds the rule set for a mode.
#[must_use]
pub fn rules_for(mode: Mode) -> Box<dyn ModeRules> {
    match mode {
        Mode::Classic => Box::new(ClassicRules),
        Mode::TimeTrial => Box::new(TimeTrialRules),
        Mode::Obstacle => Box::new(ObstacleRules),
    }
}

/// No timer, no obstacles; termination only via collision.
pub struct ClassicRules;

impl ModeRules for ClassicRules {
    fn on_start(&mut self, _session: &mut Session, _rng: &mut StdRng) {}
}

/// 30-second countdown, extended by eating and by score streaks.
pub struct TimeTrialRules;

impl ModeRules for TimeTrialRules {
    fn on_start(&mut self, session: &mut Session, _rng: &mut StdRng) {
        session.clock = Some(TimeTrialClock {
            remaining_secs: TIME_TRIAL_START_SECS,
            running: true,
        });
    }

    fn on_second(&mut self, session: &mut Session) {
        if let Some(clock) = session.clock.as_mut() {
            if clock.running {
                clock.remaining_secs = clock.remaining_secs.saturating_sub(1);
            }
        }
    }

    fn on_food_eaten(&mut self, session: &mut Session, _points_scored: u32) {
        let streak_hit = session.score % POINTS_PER_LEVEL == 0;
        if let Some(clock) = session.clock.as_mut() {
            clock.remaining_secs += TIME_TRIAL_FOOD_BONUS_SECS;
            if streak_hit {
                clock.remaining_secs += TIME_TRIAL_STREAK_BONUS_SECS;
                session.events.push(GameEvent::TimeBonus {
                    secs: TIME_TRIAL_STREAK_BONUS_SECS,
                });
            }
        }
    }

    fn on_end(&mut self, session: &mut Session) {
        if let Some(clock) = session.clock.as_mut() {
            clock.running = false;
        }
    }

    fn on_pause(&mut self, session: &mut Session) {
        if let Some(clock) = session.clock.as_mut() {
            clock.running = false;
        }
    }

    fn on_resume(&mut self, session: &mut Session) {
        if let Some(clock) = session.clock.as_mut() {
            clock.running = true;
        }
    }

    fn uses_countdown(&self) -> bool {
        true
    }
}

/// Classic rules plus a static obstacle field placed once at start.
pub struct ObstacleRules;

impl ModeRules for ObstacleRules {
    fn on_start(&mut self, session: &mut Session, rng: &mut StdRng) {
        session.obstacles =
            spawn::place_obstacles(rng, session.grid, &session.snake, session.spawn_anchor);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{GameEvent, Mode, ModeRules, ObstacleRules, TimeTrialRules, rules_for};
    use crate::config::{POINTS_PER_FOOD, TIME_TRIAL_START_SECS};
    use crate::engine::Session;
    use crate::grid::Grid;

    fn session(mode: Mode) -> Session {
        let grid = Grid::new(600, 20).expect("600 is a multiple of 20");
        Session::fresh(grid, mode, 1)
    }

    fn remaining(session: &Session) -> u32 {
        session.clock.expect("time-trial session has a clock").remaining_secs
    }

    #[test]
    fn mode_cycle_visits_all_three_variants()  {
        assert_eq!(Mode::Classic.next(), Mode::TimeTrial);
        assert_eq!(Mode::TimeTrial.next(), Mode::Obstacle);
        assert_eq!(Mode::Obstacle.next(), Mode::Classic);
        assert_eq!(Mode::Classic.previous(), Mode::Obstacle);
    }

    #[test]
    fn time_trial_starts_with_thirty_seconds() {
        let mut rules = TimeTrialRules;
        let mut session = session(Mode::TimeTrial);
        let mut rng = StdRng::seed_from_u64(1);

        rules.on_start(&mut session, &mut rng);
        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS);
        assert!(rules.uses_countdown());
    }

    #[test]
    fn eating_adds_five_seconds() {
        let mut rules = TimeTrialRules;
        let mut session = session(Mode::TimeTrial);
        let mut rng = StdRng::seed_from_u64(1);
        rules.on_start(&mut session, &mut rng);

        session.score = POINTS_PER_FOOD;
        rules.on_food_eaten(&mut session, POINTS_PER_FOOD);

        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS + 5);
        assert!(session.events.is_empty());
    }

    #[test]
    fn fiftieth_point_grants_the_streak_bonus() {
        let mut rules = TimeTrialRules;
        let mut session = session(Mode::TimeTrial);
        let mut rng = StdRng::seed_from_u64(1);
        rules.on_start(&mut session, &mut rng);

        for food in 1..=5u32 {
            session.score = food * POINTS_PER_FOOD;
            rules.on_food_eaten(&mut session, POINTS_PER_FOOD);
        }

        // Five foods: 5 * 5s plus the one streak bonus at score 50.
        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS + 25 + 20);
        assert_eq!(session.events, vec![GameEvent::TimeBonus { secs: 20 }]);
    }

    #[test]
    fn countdown_only_runs_while_unpaused() {
        let mut rules = TimeTrialRules;
        let mut session = session(Mode::TimeTrial);
        let mut rng = StdRng::seed_from_u64(1);
        rules.on_start(&mut session, &mut rng);

        rules.on_second(&mut session);
        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS - 1);

        rules.on_pause(&mut session);
        rules.on_second(&mut session);
        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS - 1);

        rules.on_resume(&mut session);
        rules.on_second(&mut session);
        assert_eq!(remaining(&session), TIME_TRIAL_START_SECS - 2);
    }

    #[test]
    fn obstacle_rules_populate_the_obstacle_field() {
        let mut rules = ObstacleRules;
        let mut session = session(Mode::Obstacle);
        let mut rng = StdRng::seed_from_u64(4);

        rules.on_start(&mut session, &mut rng);

        assert!(!session.obstacles.is_empty());
        for obstacle in &session.obstacles {
            assert!(!session.snake.occupies(*obstacle));
        }
    }

    #[test]
    fn classic_rules_add_no_clock_or_obstacles() {
        let mut rules = rules_for(Mode::Classic);
        let mut session = session(Mode::Classic);
        let mut rng = StdRng::seed_from_u64(1);

        rules.on_start(&mut session, &mut rng);

        assert!(session.clock.is_none());
        assert!(session.obstacles.is_empty());
        assert!(!rules.uses_countdown());
    }
}
