//! High score leaderboard
//!
//! One entry per user: a submission only replaces the user's entry when it
//! is strictly higher. Non-positive scores are ignored. Persisted as JSON
//! when a path is configured.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::platform::{ScoreEntry, ScoreReporter};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub user_id: String,
    pub display_name: String,
    pub score: u64,
    /// Furthest wave this user has reported, across all submissions
    pub highest_wave: u32,
}

/// What a submission did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Zero score, not recorded
    Ignored,
    /// User already has an equal or better score; `wave_raised` when the
    /// submission still pushed their furthest wave
    NotHigher { current: u64, wave_raised: bool },
    /// Recorded at this 1-indexed rank
    Ranked(usize),
    /// Higher than the user's best but below the board cutoff
    OffBoard,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl HighScores {
    /// Create empty, memory-only leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path` (missing or corrupt file starts fresh); later
    /// submissions are saved back there
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut scores = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt leaderboard {}: {e}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        };
        scores.path = Some(path.to_path_buf());
        scores
    }

    pub fn save(&self) -> Result<(), ReportError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// 1-indexed rank of a user, if on the board
    pub fn rank_of(&self, user_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.user_id == user_id)
            .map(|i| i + 1)
    }

    /// Record a score under the per-user, strictly-higher rule
    pub fn record(&mut self, entry: &ScoreEntry) -> Submission {
        if entry.score == 0 {
            return Submission::Ignored;
        }

        let existing = self
            .entries
            .iter()
            .position(|e| e.user_id == entry.external_user_id);
        let mut highest_wave = entry.wave_reached;
        if let Some(i) = existing {
            let current = &mut self.entries[i];
            let wave_raised = entry.wave_reached > current.highest_wave;
            current.highest_wave = current.highest_wave.max(entry.wave_reached);
            if entry.score <= current.score {
                return Submission::NotHigher {
                    current: current.score,
                    wave_raised,
                };
            }
            highest_wave = current.highest_wave;
            self.entries.remove(i);
        }

        let new_entry = HighScoreEntry {
            user_id: entry.external_user_id.clone(),
            display_name: entry.display_name.clone(),
            score: entry.score,
            highest_wave,
        };

        // Sorted descending; ties keep the earlier entry first
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, new_entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        if pos < MAX_HIGH_SCORES {
            Submission::Ranked(pos + 1)
        } else {
            Submission::OffBoard
        }
    }
}

impl ScoreReporter for HighScores {
    fn submit(&mut self, entry: &ScoreEntry) -> Result<(), ReportError> {
        if entry.external_user_id.is_empty() {
            return Err(ReportError::Rejected("missing user id".to_string()));
        }
        match self.record(entry) {
            Submission::Ranked(rank) => {
                log::info!("{} placed #{rank} with {}", entry.display_name, entry.score);
                self.save()
            }
            Submission::NotHigher {
                wave_raised: true, ..
            } => {
                log::debug!("{} reached a new furthest wave", entry.display_name);
                self.save()
            }
            other => {
                log::debug!("Score {} not recorded: {other:?}", entry.score);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, score: u64, wave: u32) -> ScoreEntry {
        ScoreEntry {
            display_name: format!("name-{user}"),
            external_user_id: user.to_string(),
            score,
            wave_reached: wave,
        }
    }

    #[test]
    fn test_zero_score_ignored() {
        let mut board = HighScores::new();
        assert_eq!(board.record(&entry("a", 0, 3)), Submission::Ignored);
        assert!(board.is_empty());
    }

    #[test]
    fn test_only_strictly_higher_replaces() {
        let mut board = HighScores::new();
        assert_eq!(board.record(&entry("a", 100, 3)), Submission::Ranked(1));
        assert_eq!(
            board.record(&entry("a", 100, 7)),
            Submission::NotHigher {
                current: 100,
                wave_raised: true
            }
        );
        assert_eq!(
            board.record(&entry("a", 90, 2)),
            Submission::NotHigher {
                current: 100,
                wave_raised: false
            }
        );
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].highest_wave, 7);

        assert_eq!(board.record(&entry("a", 150, 4)), Submission::Ranked(1));
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.top_score(), Some(150));
        assert_eq!(board.entries[0].highest_wave, 7);
    }

    #[test]
    fn test_sorted_and_capped() {
        let mut board = HighScores::new();
        for i in 0..15u64 {
            board.record(&entry(&format!("u{i}"), (i + 1) * 10, 1));
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(150));
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(board.rank_of("u14"), Some(1));
        assert_eq!(board.rank_of("u0"), None);

        assert_eq!(board.record(&entry("late", 5, 1)), Submission::OffBoard);
        assert_eq!(board.rank_of("late"), None);
    }

    #[test]
    fn test_submit_rejects_missing_user() {
        let mut board = HighScores::new();
        assert!(matches!(
            board.submit(&entry("", 10, 1)),
            Err(ReportError::Rejected(_))
        ));
    }

    #[test]
    fn test_persisted_between_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = HighScores::load(&path);
        assert!(board.is_empty());
        board.submit(&entry("a", 40, 2)).unwrap();
        board.submit(&entry("b", 90, 5)).unwrap();

        let reloaded = HighScores::load(&path);
        assert_eq!(reloaded.entries, board.entries);
        assert_eq!(reloaded.rank_of("b"), Some(1));
    }

    #[test]
    fn test_furthest_wave_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = HighScores::load(&path);
        board.submit(&entry("a", 100, 3)).unwrap();
        // Lower score, further wave: only the wave changes
        board.submit(&entry("a", 50, 9)).unwrap();

        let reloaded = HighScores::load(&path);
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries[0].score, 100);
        assert_eq!(reloaded.entries[0].highest_wave, 9);
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = HighScores::load(dir.path().join("missing/dir/scores.json"));
        assert!(matches!(board.submit(&entry("a", 1, 1)), Err(ReportError::Io(_))));
    }
}
