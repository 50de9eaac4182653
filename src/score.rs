//! Best-score tracking with pluggable persistence. Store failures are never
//! fatal: the in-memory best keeps the HUD honest for the rest of the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::modes::Mode;

const APP_DIR_NAME: &str = "snake-arena";
const SCORE_FILE_NAME: &str = "scores.json";

/// Persistence contract: one best score per mode, missing data reads as 0.
pub trait ScoreStore {
    fn get(&self, mode: Mode) -> io::Result<u32>;
    fn set(&mut self, mode: Mode, score: u32) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    classic: u32,
    #[serde(default)]
    time_trial: u32,
    #[serde(default)]
    obstacle: u32,
}

impl ScoreFile {
    fn get(self, mode: Mode) -> u32 {
        match mode {
            Mode::Classic => self.classic,
            Mode::TimeTrial => self.time_trial,
            Mode::Obstacle => self.obstacle,
        }
    }

    fn set(&mut self, mode: Mode, score: u32) {
        match mode {
            Mode::Classic => self.classic = score,
            Mode::TimeTrial => self.time_trial = score,
            Mode::Obstacle => self.obstacle = score,
        }
    }
}

/// JSON score file in the platform-local data directory.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Store at the platform-correct default path.
    #[must_use]
    pub fn new() -> Self {
        let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.push(APP_DIR_NAME);
        base.push(SCORE_FILE_NAME);
        Self { path: base }
    }

    /// Store at an explicit path, for tests.
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> io::Result<ScoreFile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, scores: ScoreFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&scores)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self, mode: Mode) -> io::Result<u32> {
        Ok(self.load()?.get(mode))
    }

    fn set(&mut self, mode: Mode, score: u32) -> io::Result<()> {
        // A corrupt file loses the other modes' bests rather than the write.
        let mut scores = self.load().unwrap_or_default();
        scores.set(mode, score);
        self.save(scores)
    }
}

/// Compares session results against the persisted per-mode best.
#[derive(Debug)]
pub struct ScoreTracker<S> {
    store: S,
    best: [u32; 3],
}

fn mode_index(mode: Mode) -> usize {
    match mode {
        Mode::Classic => 0,
        Mode::TimeTrial => 1,
        Mode::Obstacle => 2,
    }
}

impl<S: ScoreStore> ScoreTracker<S> {
    /// Loads the persisted bests. Read failures fall back to 0 so a corrupt
    /// score file never blocks play.
    pub fn new(store: S) -> Self {
        let mut best = [0; 3];
        for mode in [Mode::Classic, Mode::TimeTrial, Mode::Obstacle] {
            best[mode_index(mode)] = store.get(mode).unwrap_or(0);
        }
        Self { store, best }
    }

    /// Best known score for `mode`.
    #[must_use]
    pub fn best(&self, mode: Mode) -> u32 {
        self.best[mode_index(mode)]
    }

    /// Whether `score` would beat the best, without recording it.
    #[must_use]
    pub fn is_ahead_of_best(&self, mode: Mode, score: u32) -> bool {
        score > self.best(mode)
    }

    /// Records a finished session's score. Returns true when it is a new
    /// best; persistence failures are swallowed and the new best is kept in
    /// memory.
    pub fn record_score(&mut self, mode: Mode, score: u32) -> bool {
        if score <= self.best(mode) {
            return false;
        }
        self.best[mode_index(mode)] = score;
        let _ = self.store.set(mode, score);
        true
    }
}
