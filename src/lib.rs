//! Cloud Surf - a three-lane endless runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `platform`: Browser/native logging and storage abstraction
//! - `highscores`: Leaderboard with LocalStorage persistence
//! - `settings`: Player preferences
//!
//! The host render loop owns the clock: it calls `sim::tick` once per frame
//! with the frame delta, drains `GameEvent`s for transient effects, and reads
//! a `HudSnapshot` to draw the HUD. Meshes, input capture, and audio never
//! appear here; the simulation only knows lanes and longitudinal positions.

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec3;

/// Module entry point on web: wire up panic reporting and console logging
/// before the host JS constructs any game state
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    platform::init_logging();
}

/// Game configuration constants
pub mod consts {
    /// Lateral lane positions (left, center, right) in world units
    pub const LANE_OFFSETS: [f32; 3] = [-2.0, 0.0, 2.0];
    /// Height at which the board and all collectibles ride
    pub const SURF_HEIGHT: f32 = 0.5;

    /// Entities spawn this far ahead of the player
    pub const SPAWN_DISTANCE: f32 = 50.0;
    /// Entities behind this z are retired
    pub const DESPAWN_DISTANCE: f32 = -10.0;

    /// Longitudinal length of one terrain segment
    pub const SEGMENT_LENGTH: f32 = 20.0;
    /// Number of live segments tiling the track
    pub const SEGMENT_COUNT: usize = 5;

    /// Base scroll speed (world units per second)
    pub const BASE_SPEED: f32 = 6.0;
    /// Scroll speed ceiling
    pub const MAX_SPEED: f32 = 20.0;

    /// Player/entity proximity below which a collision resolves
    pub const COLLISION_RADIUS: f32 = 1.0;

    /// Dream level ceiling
    pub const DREAM_MAX: f32 = 100.0;
    /// Passive dream drain per second of play
    pub const DREAM_DRAIN_PER_SEC: f32 = 2.0;
    /// Dream lost on an unshielded cloud hit
    pub const CLOUD_HIT_PENALTY: f32 = 20.0;
    /// Dream restored by a shard
    pub const SHARD_DREAM_RESTORE: f32 = 10.0;

    /// Base points per shard (scaled by the combo multiplier)
    pub const SHARD_BASE_POINTS: f64 = 10.0;
    /// Distance score rate: points per (world unit of speed x second)
    pub const DISTANCE_POINTS_RATE: f64 = 10.0;

    /// Combo window in sim milliseconds
    pub const COMBO_DURATION_MS: f64 = 3000.0;
    /// Multiplier step per combo count
    pub const COMBO_STEP: f64 = 0.5;

    /// Time between power-up spawn attempts
    pub const POWER_UP_SPAWN_INTERVAL_MS: f64 = 5000.0;
    /// Chance that a spawn attempt actually produces a power-up
    pub const POWER_UP_CHANCE: f32 = 0.4;
    /// Maximum live, uncollected power-up entities
    pub const MAX_LIVE_POWER_UPS: usize = 2;

    /// Game over screen lingers this long before returning to the menu
    pub const GAME_OVER_LINGER_MS: f64 = 3000.0;

    /// Difficulty escalates on this play-time cadence
    pub const ESCALATE_INTERVAL_MS: f64 = 30_000.0;
    /// Score needed per level: level * LEVEL_THRESHOLD
    pub const LEVEL_THRESHOLD: f64 = 300.0;
}

/// Squared distance in the surf plane (x/z), ignoring height
#[inline]
pub fn plane_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Distance in the surf plane (x/z), ignoring height
#[inline]
pub fn plane_distance(a: Vec3, b: Vec3) -> f32 {
    plane_distance_sq(a, b).sqrt()
}
