//! Combo chain tracking
//!
//! Each shard collected within the combo window bumps the chain; the score
//! multiplier grows linearly with the chain length. Expiry is polled against
//! the sim clock once per tick - there is no timer callback that could fire
//! into a later session.

use crate::consts::{COMBO_DURATION_MS, COMBO_STEP};

/// Sliding-window score multiplier
#[derive(Debug, Clone)]
pub struct ComboTracker {
    count: u32,
    multiplier: f64,
    /// Sim time at which the current chain goes stale
    deadline_ms: f64,
    /// High-water mark for the session
    max_combo: u32,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self {
            count: 0,
            multiplier: 1.0,
            deadline_ms: 0.0,
            max_combo: 0,
        }
    }
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the chain and refresh the expiry window
    pub fn increment(&mut self, now_ms: f64) {
        self.count += 1;
        self.multiplier = 1.0 + f64::from(self.count) * COMBO_STEP;
        self.deadline_ms = now_ms + COMBO_DURATION_MS;
        if self.count > self.max_combo {
            self.max_combo = self.count;
        }
    }

    /// Drop the chain back to baseline if the window has lapsed.
    /// Returns true if a non-empty chain was reset.
    pub fn expire_if_stale(&mut self, now_ms: f64) -> bool {
        if self.count > 0 && now_ms >= self.deadline_ms {
            self.count = 0;
            self.multiplier = 1.0;
            true
        } else {
            false
        }
    }

    /// Full reset, including the high-water mark (game restart only)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }
}
