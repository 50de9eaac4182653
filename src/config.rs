use std::time::Duration;

use thiserror::Error;

use crate::modes::Mode;
use crate::theme::ThemeId;

/// Default board edge length in logical pixels.
pub const DEFAULT_BOARD_SIZE: i32 = 600;

/// Default edge length of one grid cell in logical pixels.
pub const DEFAULT_CELL_SIZE: i32 = 20;

/// Segments the snake spawns with.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points awarded per food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Points needed per level increase above the selected starting level.
pub const POINTS_PER_LEVEL: u32 = 50;

/// Highest reachable level.
pub const MAX_LEVEL: u8 = 10;

/// Lowest selectable level.
pub const MIN_LEVEL: u8 = 1;

/// Starting time-trial budget in seconds.
pub const TIME_TRIAL_START_SECS: u32 = 30;

/// Seconds added per food in time-trial mode.
pub const TIME_TRIAL_FOOD_BONUS_SECS: u32 = 5;

/// Extra seconds granted at every cumulative-score multiple of
/// [`POINTS_PER_LEVEL`] in time-trial mode.
pub const TIME_TRIAL_STREAK_BONUS_SECS: u32 = 20;

/// Inclusive range the obstacle-count sample is drawn from.
pub const OBSTACLE_COUNT_MIN: u32 = 5;
pub const OBSTACLE_COUNT_MAX: u32 = 12;

/// Placement attempts per obstacle before it is skipped.
pub const OBSTACLE_PLACEMENT_RETRIES: u32 = 50;

/// Movement tick interval per level, level 1 first. Strictly decreasing.
const TICK_INTERVALS_MS: [u64; MAX_LEVEL as usize] =
    [240, 220, 200, 180, 160, 140, 120, 105, 90, 80];

/// Returns the movement interval for a level, clamping out-of-range input
/// to the table edges.
#[must_use]
pub fn tick_interval_for_level(level: u8) -> Duration {
    let idx = usize::from(level.clamp(MIN_LEVEL, MAX_LEVEL) - 1);
    Duration::from_millis(TICK_INTERVALS_MS[idx])
}

/// Returns the level reached at `score` when starting from `selected_level`.
#[must_use]
pub fn level_for_score(selected_level: u8, score: u32) -> u8 {
    let gained = score / POINTS_PER_LEVEL;
    let gained = u8::try_from(gained).unwrap_or(MAX_LEVEL);
    selected_level.saturating_add(gained).min(MAX_LEVEL)
}

/// Fatal configuration problems caught before a session starts.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ConfigError {
    #[error("board size {board_size} and cell size {cell_size} must be positive")]
    NonPositiveBoard { board_size: i32, cell_size: i32 },
    #[error("board size {board_size} is not a multiple of cell size {cell_size}")]
    MisalignedBoard { board_size: i32, cell_size: i32 },
    #[error("level {0} is outside {MIN_LEVEL}..={MAX_LEVEL}")]
    LevelOutOfRange(u8),
}

/// Values read once at session start: mode, starting level, color theme.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub level: u8,
    pub theme: ThemeId,
}

impl SessionConfig {
    /// Rejects configurations that must not reach `start_game`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(ConfigError::LevelOutOfRange(self.level));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Classic,
            level: MIN_LEVEL,
            theme: ThemeId::Classic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_intervals_strictly_decrease_with_level() {
        for level in MIN_LEVEL..MAX_LEVEL {
            assert!(
                tick_interval_for_level(level) > tick_interval_for_level(level + 1),
                "level {level} must be slower than level {}",
                level + 1
            );
        }
    }

    #[test]
    fn out_of_range_levels_clamp_to_table_edges() {
        assert_eq!(tick_interval_for_level(0), tick_interval_for_level(1));
        assert_eq!(tick_interval_for_level(42), tick_interval_for_level(10));
    }

    #[test]
    fn level_for_score_is_capped_and_monotonic() {
        assert_eq!(level_for_score(1, 0), 1);
        assert_eq!(level_for_score(1, 49), 1);
        assert_eq!(level_for_score(1, 50), 2);
        assert_eq!(level_for_score(3, 120), 5);
        assert_eq!(level_for_score(8, 500), 10);
        assert_eq!(level_for_score(10, 0), 10);

        let mut previous = 0;
        for score in (0..1000).step_by(10) {
            let level = level_for_score(2, score);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn session_config_rejects_bad_levels() {
        let mut config = SessionConfig::default();
        config.level = 0;
        assert_eq!(config.validate(), Err(ConfigError::LevelOutOfRange(0)));
        config.level = 11;
        assert_eq!(config.validate(), Err(ConfigError::LevelOutOfRange(11)));
        config.level = 10;
        assert!(config.validate().is_ok());
    }
}
