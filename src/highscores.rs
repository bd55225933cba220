//! High score leaderboard system
//!
//! Persisted under the `highScores` key as a plain JSON array, tracks the
//! top 10 runs.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Locale date string of the run
    pub date: String,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub const STORAGE_KEY: &'static str = "highScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        self.potential_rank(score).is_some()
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't
    /// make the cut). Equal scores rank below the existing ones.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_HIGH_SCORES).then_some(rank)
    }

    /// Add a finished run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, date: String) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, HighScoreEntry { score, level, date });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (0 when empty)
    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Load from the store; missing or corrupt data yields an empty board.
    /// Entries are re-sorted in case the stored array was edited by hand.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut scores: Self = persistence::load_or_default(store, Self::STORAGE_KEY);
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        scores
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        if persistence::save_or_warn(store, Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}

/// Score as shown in the HUD: at least six digits, zero padded
pub fn format_score(score: u64) -> String {
    format!("{:06}", score)
}

/// Today's date in the browser's locale
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let date = js_sys::Date::new_0();
    String::from(date.to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    "N/A".to_string()
}
