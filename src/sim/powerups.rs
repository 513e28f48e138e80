//! Active power-up effects
//!
//! At most one active effect per kind; picking the same kind up again restarts
//! its window rather than stacking. Expiry is polled once per tick against the
//! sim clock - collecting a power-up never schedules a deferred callback.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::POWER_UP_CHANCE;

/// Speed boost factor while the Speed effect is active
pub const SPEED_BOOST_FACTOR: f32 = 1.5;
/// Shard attraction radius while the Magnet effect is active
pub const MAGNET_RADIUS: f32 = 10.0;

/// Power-up kinds, with per-kind effect durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Shield, PowerUpKind::Magnet];

    /// Effect duration in sim milliseconds
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::Speed => 7000.0,
            PowerUpKind::Shield => 5000.0,
            PowerUpKind::Magnet => 6000.0,
        }
    }
}

/// One running effect
#[derive(Debug, Clone, Copy)]
struct ActiveEffect {
    kind: PowerUpKind,
    started_at_ms: f64,
}

/// Set of currently active effects, keyed by kind
#[derive(Debug, Clone, Default)]
pub struct PowerUpRegistry {
    active: Vec<ActiveEffect>,
}

impl PowerUpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh an effect; the window always restarts from `now_ms`
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) {
        if let Some(effect) = self.active.iter_mut().find(|e| e.kind == kind) {
            effect.started_at_ms = now_ms;
        } else {
            self.active.push(ActiveEffect {
                kind,
                started_at_ms: now_ms,
            });
        }
    }

    /// Drop effects whose window has lapsed, returning the kinds that expired.
    /// Must run once per tick before any effect query.
    pub fn expire(&mut self, now_ms: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain(|e| {
            if now_ms - e.started_at_ms >= e.kind.duration_ms() {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn has_shield(&self) -> bool {
        self.is_active(PowerUpKind::Shield)
    }

    pub fn has_magnet(&self) -> bool {
        self.is_active(PowerUpKind::Magnet)
    }

    /// Attraction radius, zero when the magnet is down
    pub fn magnet_radius(&self) -> f32 {
        if self.has_magnet() { MAGNET_RADIUS } else { 0.0 }
    }

    /// Scroll speed with the Speed boost applied when active
    pub fn effective_speed(&self, base: f32) -> f32 {
        if self.is_active(PowerUpKind::Speed) {
            base * SPEED_BOOST_FACTOR
        } else {
            base
        }
    }

    /// Draw a kind for a spawn attempt, or None when the gate roll fails
    pub fn pick_config<R: Rng>(rng: &mut R) -> Option<PowerUpKind> {
        if rng.random::<f32>() < POWER_UP_CHANCE {
            let idx = rng.random_range(0..PowerUpKind::ALL.len());
            Some(PowerUpKind::ALL[idx])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_speed_boost_window() {
        let mut reg = PowerUpRegistry::new();
        reg.activate(PowerUpKind::Speed, 1000.0);

        reg.expire(1000.0 + PowerUpKind::Speed.duration_ms() - 1.0);
        assert!((reg.effective_speed(6.0) - 9.0).abs() < 1e-6);

        let expired = reg.expire(1000.0 + PowerUpKind::Speed.duration_ms());
        assert_eq!(expired, vec![PowerUpKind::Speed]);
        assert!((reg.effective_speed(6.0) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_reactivation_restarts_window() {
        let mut reg = PowerUpRegistry::new();
        reg.activate(PowerUpKind::Shield, 0.0);
        // Refresh just before expiry; the effect must survive a full new window
        reg.activate(PowerUpKind::Shield, 4999.0);
        assert!(reg.expire(5000.0).is_empty());
        assert!(reg.has_shield());
        assert!(!reg.expire(4999.0 + PowerUpKind::Shield.duration_ms()).is_empty());
        assert!(!reg.has_shield());
    }

    #[test]
    fn test_magnet_radius_tracks_activation() {
        let mut reg = PowerUpRegistry::new();
        assert_eq!(reg.magnet_radius(), 0.0);
        reg.activate(PowerUpKind::Magnet, 0.0);
        assert_eq!(reg.magnet_radius(), MAGNET_RADIUS);
    }

    #[test]
    fn test_independent_expiry_per_kind() {
        let mut reg = PowerUpRegistry::new();
        reg.activate(PowerUpKind::Shield, 0.0);
        reg.activate(PowerUpKind::Speed, 2001.0);
        let expired = reg.expire(5000.0);
        assert_eq!(expired, vec![PowerUpKind::Shield]);
        assert!(reg.is_active(PowerUpKind::Speed));
    }

    #[test]
    fn test_pick_config_gate() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawned = 0usize;
        let trials = 10_000;
        for _ in 0..trials {
            if PowerUpRegistry::pick_config(&mut rng).is_some() {
                spawned += 1;
            }
        }
        let rate = spawned as f32 / trials as f32;
        assert!((rate - POWER_UP_CHANCE).abs() < 0.02, "rate {rate}");
    }
}
