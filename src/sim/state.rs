//! Game state and core simulation types
//!
//! Everything the host needs to observe comes out of here as either a
//! `HudSnapshot` (read each frame) or a `GameEvent` (drained each frame).

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::difficulty::DifficultyCurve;
use super::powerups::{PowerUpKind, PowerUpRegistry};
use super::spawn::{SegmentField, SpawnCtx};
use super::track::EntityTrack;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu; ticks are no-ops until a start command arrives
    Menu,
    /// Active run
    Playing,
    /// Run ended; returns to Menu automatically after a fixed linger
    GameOver,
}

/// One of the three lateral lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Lateral world position of the lane center
    pub fn offset(self) -> f32 {
        LANE_OFFSETS[self.index()]
    }

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    /// Lane to the left, clamped at the edge
    pub fn left(self) -> Lane {
        match self {
            Lane::Right => Lane::Center,
            _ => Lane::Left,
        }
    }

    /// Lane to the right, clamped at the edge
    pub fn right(self) -> Lane {
        match self {
            Lane::Left => Lane::Center,
            _ => Lane::Right,
        }
    }
}

/// What a spawned entity is, with the fields the sim actually needs.
/// Meshes, lights, and materials live host-side in a table keyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Obstacle; storm clouds are the flagged dangerous variant
    Cloud { stormy: bool },
    /// Dream shard collectible
    Shard,
    /// Temporary effect pickup
    PowerUp(PowerUpKind),
}

/// A lane-bound entity scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: Lane,
    pub pos: Vec3,
}

/// Discrete notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    EntitySpawned { id: u32, kind: EntityKind, pos: Vec3 },
    EntityDestroyed { id: u32 },
    /// Unshielded cloud collision (red flash, particles)
    ObstacleHit { pos: Vec3 },
    ShardCollected { pos: Vec3, points: f64 },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    LevelUp(u32),
    GameOver { score: f64, max_combo: u32 },
}

/// Read-only HUD state, captured once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: f64,
    pub high_score: f64,
    pub dream_level: f32,
    pub combo: u32,
    pub combo_multiplier: f64,
    pub level: u32,
    pub speed: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Polled sim clock; every subsystem reads this one snapshot per tick
    pub time_ms: f64,
    pub dream_level: f32,
    pub score: f64,
    /// Best score seen; seeded from persistence by the host
    pub high_score: f64,
    pub player_lane: Lane,
    pub combo: ComboTracker,
    pub effects: PowerUpRegistry,
    pub difficulty: DifficultyCurve,
    /// Terrain segments (clouds + shards)
    pub field: SegmentField,
    /// Live uncollected power-up entities
    pub power_ups: EntityTrack,
    pub(crate) next_id: u32,
    pub(crate) last_power_up_attempt_ms: f64,
    pub(crate) last_escalation_ms: f64,
    pub(crate) game_over_at_ms: f64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state sitting in the main menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            time_ms: 0.0,
            dream_level: DREAM_MAX,
            score: 0.0,
            high_score: 0.0,
            player_lane: Lane::Center,
            combo: ComboTracker::new(),
            effects: PowerUpRegistry::new(),
            difficulty: DifficultyCurve::new(),
            field: SegmentField::new(),
            power_ups: EntityTrack::new(),
            next_id: 1,
            last_power_up_attempt_ms: 0.0,
            last_escalation_ms: 0.0,
            game_over_at_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Board position: lane center at surf height, z = 0
    pub fn player_pos(&self) -> Vec3 {
        Vec3::new(self.player_lane.offset(), SURF_HEIGHT, 0.0)
    }

    /// Add points through the combo multiplier, ignoring garbage amounts.
    /// Returns the points actually awarded.
    pub fn add_points(&mut self, amount: f64) -> f64 {
        if !amount.is_finite() {
            log::warn!("ignoring non-finite point amount");
            return 0.0;
        }
        let awarded = amount * self.combo.multiplier();
        self.score += awarded;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        awarded
    }

    /// Full reset of every subsystem, then straight into a run.
    /// Resetting the polled deadlines here is what cancels any pending
    /// expiry from the previous session.
    pub fn start_run(&mut self) {
        self.dream_level = DREAM_MAX;
        self.score = 0.0;
        self.player_lane = Lane::Center;
        self.combo.reset();
        self.effects.clear();
        self.difficulty.reset();
        self.power_ups.clear(&mut self.events);
        self.last_power_up_attempt_ms = self.time_ms;
        self.last_escalation_ms = self.time_ms;
        self.game_over_at_ms = 0.0;

        let mut ctx = SpawnCtx {
            rng: &mut self.rng,
            next_id: &mut self.next_id,
            events: &mut self.events,
        };
        self.field.regenerate(&self.difficulty, &mut ctx);

        self.phase = GamePhase::Playing;
        log::info!("run started (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand this frame's notifications to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud_snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            dream_level: self.dream_level,
            combo: self.combo.count(),
            combo_multiplier: self.combo.multiplier(),
            level: self.difficulty.level(),
            speed: self.effects.effective_speed(self.difficulty.speed()),
        }
    }
}
