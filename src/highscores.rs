//! High score record
//!
//! Persisted as a JSON file holding the best score and the full run history.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEntry {
    /// Final score
    pub score: u64,
    /// ISO-8601 UTC time the run ended
    pub ts: String,
    /// Player name
    pub name: String,
}

/// The persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScoreRecord {
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub runs: Vec<RunEntry>,
}

impl HighScoreRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run. Returns true if it set a new high score.
    pub fn submit(&mut self, score: u64, name: &str, ts: String) -> bool {
        self.runs.push(RunEntry {
            score,
            ts,
            name: name.to_string(),
        });
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Restore `high_score >= every run` after loading a hand-edited file
    pub fn repair(&mut self) {
        let best = self.runs.iter().map(|r| r.score).max().unwrap_or(0);
        if best > self.high_score {
            log::warn!(
                "High score {} below best recorded run {}, repairing",
                self.high_score,
                best
            );
            self.high_score = best;
        }
    }

    /// Top `n` runs, best first (ties keep the earlier run first)
    pub fn leaderboard(&self, n: usize) -> Vec<&RunEntry> {
        let mut runs: Vec<&RunEntry> = self.runs.iter().collect();
        runs.sort_by(|a, b| b.score.cmp(&a.score));
        runs.truncate(n);
        runs
    }

    /// Check if the record has no runs yet
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// A record bound to its file
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    record: HighScoreRecord,
}

impl HighScoreStore {
    /// Load the record at `path`; missing or corrupt files start empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut record: HighScoreRecord = persistence::read_json_or_default(&path);
        record.repair();
        log::info!(
            "Loaded high score {} ({} runs) from {}",
            record.high_score,
            record.runs.len(),
            path.display()
        );
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &HighScoreRecord {
        &self.record
    }

    pub fn high_score(&self) -> u64 {
        self.record.high_score
    }

    /// Record a finished run and write the file.
    ///
    /// The in-memory record is updated even if the write fails.
    pub fn submit(&mut self, score: u64, name: &str, ts: String) -> Result<bool, PersistError> {
        let is_best = self.record.submit(score, name, ts);
        self.save()?;
        if is_best {
            log::info!("New high score: {}", score);
        }
        Ok(is_best)
    }

    /// Write the record atomically
    pub fn save(&self) -> Result<(), PersistError> {
        persistence::write_json_atomic(&self.path, &self.record)
    }
}

/// Format a time as an ISO-8601 UTC timestamp (`2026-10-18T09:30:00Z`)
pub fn format_timestamp(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Current time as an ISO-8601 UTC timestamp
pub fn now_timestamp() -> String {
    format_timestamp(SystemTime::now())
}

/// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian calendar
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
