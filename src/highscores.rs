//! High score leaderboard
//!
//! Keeps the top N scores, highest first. Persisted as a flat JSON array of
//! integers through the [`Store`].

use crate::error::Result;
use crate::persistence::Store;

/// Default number of high scores to keep
pub const DEFAULT_MAX_HIGH_SCORES: usize = 10;

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    /// Sorted descending, never longer than `capacity`
    scores: Vec<u64>,
    capacity: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HIGH_SCORES)
    }
}

impl HighScores {
    /// Store key
    const STORAGE_KEY: &'static str = "highscores";

    /// Create empty leaderboard
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: Vec::new(),
            capacity,
        }
    }

    /// Build from an arbitrary list, restoring the ordering and size limits
    pub fn from_scores(mut scores: Vec<u64>, capacity: usize) -> Self {
        scores.retain(|&s| s > 0);
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(capacity);
        Self { scores, capacity }
    }

    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 || self.capacity == 0 {
            return false;
        }
        if self.scores.len() < self.capacity {
            return true;
        }
        // Check if score beats the lowest entry
        self.scores.last().map(|&s| score > s).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.scores.iter().position(|&s| score > s);
        Some(rank.unwrap_or(self.scores.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.scores.insert(rank - 1, score);
        self.scores.truncate(self.capacity);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.scores.first().copied()
    }

    /// Load high scores, starting fresh if nothing usable is stored
    pub fn load(store: &Store, capacity: usize) -> Self {
        match store.read::<Vec<u64>>(Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                let scores = Self::from_scores(scores, capacity);
                log::info!("Loaded {} high scores", scores.scores.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new(capacity)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high scores: {}", e);
                Self::new(capacity)
            }
        }
    }

    /// Save high scores as a flat list
    pub fn save(&self, store: &Store) -> Result<()> {
        store.write(Self::STORAGE_KEY, &self.scores)?;
        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }
}
