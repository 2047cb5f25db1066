//! Daily quiz streak and its storage.

use chrono::NaiveDate;
use climatask_core::PersistenceError;
use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{ensure_parent, write_json_atomic};

/// Consecutive-day play counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub streak: u32,
    pub last_play_date: Option<NaiveDate>,
}

impl StreakState {
    pub fn played_on(&self, day: NaiveDate) -> bool {
        self.last_play_date == Some(day)
    }

    /// State after a daily attempt on `today`.
    pub fn advanced(&self, today: NaiveDate) -> Self {
        Self {
            streak: calculate_streak(self.streak, self.last_play_date, today),
            last_play_date: Some(today),
        }
    }
}

/// Streak after playing on `today`.
///
/// First play starts at 1; playing the day after the last play extends the
/// streak; playing again the same day keeps it; any other gap restarts at 1.
pub fn calculate_streak(current: u32, last_play: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_play else {
        return 1;
    };
    match (today - last).num_days() {
        1 => current.saturating_add(1),
        0 => current,
        _ => 1,
    }
}

/// Outcome of recording a daily attempt against the stored streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The stored streak was advanced to this state.
    Recorded(StreakState),
    /// The store already held an attempt for that day; nothing was written.
    AlreadyPlayed(StreakState),
}

/// Storage for the single streak record.
pub trait StreakStore: Send + Sync {
    /// Stored state, or the zero state if absent or unreadable.
    fn load(&self) -> StreakState;

    /// Overwrite the stored state.
    fn save(&self, state: &StreakState) -> Result<(), PersistenceError>;

    /// Advance the stored streak for a play on `today`, unless the stored
    /// state already records that day. Reading, checking and writing happen
    /// as one step.
    fn record_attempt(&self, today: NaiveDate) -> Result<Attempt, PersistenceError>;
}

/// Streak kept as a small JSON document.
///
/// Writes and the read-check-write of `record_attempt` hold an exclusive
/// lock on a sibling `.lock` file, so two running instances cannot both
/// advance the streak for the same day.
#[derive(Debug, Clone)]
pub struct JsonStreakStore {
    path: PathBuf,
}

impl JsonStreakStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn try_load(&self) -> Result<StreakState, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StreakState::default()),
            Err(e) => return Err(PersistenceError::read(&self.path, e)),
        };
        serde_json::from_str(&text).map_err(|e| PersistenceError::read(&self.path, e))
    }

    /// Run `f` holding the exclusive lock; released when the lock file drops.
    fn with_lock<T>(
        &self,
        f: impl FnOnce() -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        ensure_parent(&self.path)?;

        let lock_path = self.lock_path();
        let lock_file =
            File::create(&lock_path).map_err(|e| PersistenceError::lock(&lock_path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| PersistenceError::lock(&lock_path, e))?;

        f()
    }

    fn write(&self, state: &StreakState) -> Result<(), PersistenceError> {
        write_json_atomic(&self.path, state)?;
        tracing::info!(
            "Saved streak {} (last played {:?})",
            state.streak,
            state.last_play_date
        );
        Ok(())
    }
}

impl StreakStore for JsonStreakStore {
    fn load(&self) -> StreakState {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!("Resetting unreadable streak: {}", e);
            StreakState::default()
        })
    }

    fn save(&self, state: &StreakState) -> Result<(), PersistenceError> {
        self.with_lock(|| self.write(state))
    }

    fn record_attempt(&self, today: NaiveDate) -> Result<Attempt, PersistenceError> {
        self.with_lock(|| {
            let current = self.load();
            if current.played_on(today) {
                tracing::debug!(
                    "Attempt for {} already recorded, streak {}",
                    today,
                    current.streak
                );
                return Ok(Attempt::AlreadyPlayed(current));
            }
            let next = current.advanced(today);
            self.write(&next)?;
            Ok(Attempt::Recorded(next))
        })
    }
}

/// In-memory store; counts saves so tests can check the once-per-day rule.
#[derive(Debug, Default)]
pub struct MemoryStreakStore {
    state: Mutex<StreakState>,
    saves: Mutex<u32>,
    fail_saves: bool,
}

impl MemoryStreakStore {
    pub fn new(state: StreakState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// A store whose saves always fail.
    pub fn failing(state: StreakState) -> Self {
        Self {
            fail_saves: true,
            ..Self::new(state)
        }
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock()
    }
}

impl StreakStore for MemoryStreakStore {
    fn load(&self) -> StreakState {
        *self.state.lock()
    }

    fn save(&self, state: &StreakState) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::write("memory", "saves disabled"));
        }
        *self.state.lock() = *state;
        *self.saves.lock() += 1;
        Ok(())
    }

    fn record_attempt(&self, today: NaiveDate) -> Result<Attempt, PersistenceError> {
        let mut state = self.state.lock();
        if state.played_on(today) {
            return Ok(Attempt::AlreadyPlayed(*state));
        }
        if self.fail_saves {
            return Err(PersistenceError::write("memory", "saves disabled"));
        }
        *state = state.advanced(today);
        *self.saves.lock() += 1;
        Ok(Attempt::Recorded(*state))
    }
}
