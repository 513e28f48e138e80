//! Player preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle budget for shard bursts and cloud puffs
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1500,
        }
    }

    /// Whether to render the distant cloud layer
    pub fn far_clouds_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether to render the dream-sky gradient fog
    pub fn fog_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera kick on cloud impacts
    pub impact_shake: bool,
    /// Particle effects (shard bursts, storm crackle)
    pub particles: bool,
    /// Full-screen flash on level up
    pub level_flash: bool,
    /// Power-up glow and trail effects
    pub powerup_effects: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when the tab loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake and flashes)
    pub reduced_motion: bool,
    /// High contrast entities
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            impact_shake: true,
            particles: true,
            level_flash: true,
            powerup_effects: true,

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "cloud_surf_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.powerup_effects = false;
            self.level_flash = false;
        }
    }

    /// Effective impact shake (respects reduced_motion)
    pub fn effective_impact_shake(&self) -> bool {
        self.impact_shake && !self.reduced_motion
    }

    /// Effective level flash (respects reduced_motion)
    pub fn effective_level_flash(&self) -> bool {
        self.level_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        if let Some(json) = storage::get(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("loaded settings");
                return settings;
            }
            log::warn!("discarding unreadable settings");
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            storage::set(Self::STORAGE_KEY, &json);
            log::info!("settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_preset_trims_effects() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.powerup_effects);
        assert!(!settings.level_flash);
        assert_eq!(settings.max_particles(), 100);
    }

    #[test]
    fn test_reduced_motion_overrides_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_impact_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_impact_shake());
        assert!(!settings.effective_level_flash());
    }

    #[test]
    fn test_particles_toggle_zeroes_budget() {
        let mut settings = Settings::default();
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_round_trip() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
