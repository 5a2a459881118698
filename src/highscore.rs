//! Best-score tracking
//!
//! A single integer persisted under a fixed key. Anything missing or
//! unreadable counts as "no best yet".

use crate::persistence::KeyValueStore;

/// Best score ever achieved on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "nxt_nakul_highscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Parse a stored value. Accepts a leading integer the way the page
    /// always has ("1200", " 42 ", "77abc" -> 77); anything else is 0.
    pub fn parse(raw: &str) -> u64 {
        let digits: String = raw
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }

    /// Load the best score from storage
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let best = Self::parse(&raw);
                log::info!("Loaded best score {}", best);
                Self { best }
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                Self::new()
            }
        }
    }

    /// Check if a finished run beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Persists and returns true when it is a new
    /// best; otherwise storage is left alone.
    pub fn submit(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New best score saved: {}", score),
            Err(e) => log::warn!("New best score {} not saved: {}", score, e),
        }
        true
    }
}
