//! Difficulty progression
//!
//! A single monotone curve drives scroll speed, cloud density, storm ratio,
//! and shard frequency. Escalation happens on a play-time cadence and on
//! score thresholds (both checked by the tick); it never goes backward within
//! a session.

use crate::consts::{BASE_SPEED, MAX_SPEED};

/// Per-escalation speed factor
pub const SPEED_FACTOR: f32 = 1.12;

/// Starting / ceiling values for the spawn parameters
pub const GAP_CHANCE_START: f32 = 0.15;
pub const GAP_CHANCE_MAX: f32 = 0.4;
pub const STORM_CHANCE_MAX: f32 = 0.25;
pub const SHARD_FREQ_START: f32 = 1.0;
pub const SHARD_FREQ_MAX: f32 = 5.0;

/// Monotone difficulty state
#[derive(Debug, Clone)]
pub struct DifficultyCurve {
    level: u32,
    speed: f32,
    /// Probability that a lane in a fresh segment is left empty
    gap_chance: f32,
    /// Probability that a spawned cloud is a storm cloud
    storm_chance: f32,
    /// Expected shards per segment
    shard_freq: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            level: 1,
            speed: BASE_SPEED,
            gap_chance: GAP_CHANCE_START,
            storm_chance: 0.0,
            shard_freq: SHARD_FREQ_START,
        }
    }
}

impl DifficultyCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump every parameter one notch toward its ceiling
    pub fn escalate(&mut self) {
        self.level += 1;
        self.speed = (self.speed * SPEED_FACTOR).min(MAX_SPEED);
        self.gap_chance = (self.gap_chance + 0.03).min(GAP_CHANCE_MAX);
        self.storm_chance = (self.storm_chance + 0.05).min(STORM_CHANCE_MAX);
        self.shard_freq = (self.shard_freq + 0.5).min(SHARD_FREQ_MAX);
        log::info!(
            "difficulty level {}: speed={:.2} gap={:.2} storm={:.2} shards={:.1}",
            self.level,
            self.speed,
            self.gap_chance,
            self.storm_chance,
            self.shard_freq
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn gap_chance(&self) -> f32 {
        self.gap_chance
    }

    pub fn storm_chance(&self) -> f32 {
        self.storm_chance
    }

    pub fn shard_freq(&self) -> f32 {
        self.shard_freq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escalate_moves_everything_harder() {
        let mut curve = DifficultyCurve::new();
        let before = curve.clone();
        curve.escalate();
        assert_eq!(curve.level(), before.level() + 1);
        assert!(curve.speed() > before.speed());
        assert!(curve.gap_chance() > before.gap_chance());
        assert!(curve.storm_chance() > before.storm_chance());
        assert!(curve.shard_freq() > before.shard_freq());
    }

    #[test]
    fn test_reset_returns_to_baseline() {
        let mut curve = DifficultyCurve::new();
        for _ in 0..10 {
            curve.escalate();
        }
        curve.reset();
        assert_eq!(curve.level(), 1);
        assert!((curve.speed() - BASE_SPEED).abs() < 1e-6);
        assert!((curve.gap_chance() - GAP_CHANCE_START).abs() < 1e-6);
    }

    proptest! {
        /// Any number of escalations keeps the curve monotone and capped
        #[test]
        fn prop_monotone_and_capped(steps in 0usize..200) {
            let mut curve = DifficultyCurve::new();
            let mut prev = curve.clone();
            for _ in 0..steps {
                curve.escalate();
                prop_assert!(curve.gap_chance() >= prev.gap_chance());
                prop_assert!(curve.storm_chance() >= prev.storm_chance());
                prop_assert!(curve.speed() >= prev.speed());
                prop_assert!(curve.gap_chance() <= GAP_CHANCE_MAX + 1e-6);
                prop_assert!(curve.storm_chance() <= STORM_CHANCE_MAX + 1e-6);
                prop_assert!(curve.shard_freq() <= SHARD_FREQ_MAX + 1e-6);
                prop_assert!(curve.speed() <= MAX_SPEED + 1e-6);
                prev = curve.clone();
            }
        }
    }
}
