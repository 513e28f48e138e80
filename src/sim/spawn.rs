//! Procedural terrain segments and power-up spawning
//!
//! The track ahead of the player is tiled by a fixed number of fixed-length
//! segments. Each fresh segment rolls cloud occupancy per lane and scatters
//! shards; once a segment's trailing edge falls behind the despawn boundary it
//! is recycled and a new one appears beyond the frontmost. Power-ups spawn on
//! their own cadence into a separate track, capped and lane-deduplicated.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyCurve;
use super::powerups::PowerUpRegistry;
use super::state::{Entity, EntityKind, GameEvent, Lane};
use super::track::EntityTrack;
use crate::consts::*;
use crate::plane_distance;

/// Lateral jitter applied to cloud positions within their lane
const CLOUD_X_JITTER: f32 = 0.2;
/// Longitudinal scatter around the power-up spawn line
const POWER_UP_Z_SCATTER: f32 = 7.5;
/// A power-up spawn is blocked within this range of a cloud
const CLOUD_CLEARANCE: f32 = 1.5;
/// ...and within this range of another collectible
const COLLECTIBLE_CLEARANCE: f32 = 2.0;

/// Mutable spawn context: the pieces of `GameState` spawning needs,
/// borrowed disjointly so field updates and RNG draws can interleave
pub struct SpawnCtx<'a> {
    pub rng: &'a mut Pcg32,
    pub next_id: &'a mut u32,
    pub events: &'a mut Vec<GameEvent>,
}

impl SpawnCtx<'_> {
    fn alloc_id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    fn spawn(&mut self, kind: EntityKind, lane: Lane, pos: Vec3) -> Entity {
        let entity = Entity {
            id: self.alloc_id(),
            kind,
            lane,
            pos,
        };
        self.events.push(GameEvent::EntitySpawned {
            id: entity.id,
            kind,
            pos,
        });
        entity
    }
}

/// One fixed-length slice of terrain
#[derive(Debug, Clone)]
pub struct Segment {
    /// Rear edge; the segment covers [start_z, start_z + SEGMENT_LENGTH)
    pub start_z: f32,
    pub clouds: EntityTrack,
    pub shards: EntityTrack,
}

impl Segment {
    /// Roll a fresh segment's contents at the given rear edge
    fn generate(start_z: f32, difficulty: &DifficultyCurve, ctx: &mut SpawnCtx) -> Self {
        let mut clouds = EntityTrack::new();
        let mut shards = EntityTrack::new();

        // Per-lane cloud occupancy, rolled independently
        for lane in Lane::ALL {
            if ctx.rng.random::<f32>() > difficulty.gap_chance() {
                let stormy = ctx.rng.random::<f32>() < difficulty.storm_chance();
                let x = lane.offset() + ctx.rng.random_range(-CLOUD_X_JITTER..CLOUD_X_JITTER);
                let pos = Vec3::new(x, SURF_HEIGHT, start_z);
                clouds.push(ctx.spawn(EntityKind::Cloud { stormy }, lane, pos));
            }
        }

        // Shard scatter: floor(freq) full trials plus one fractional trial,
        // so freq is the expected shard count per segment
        let freq = difficulty.shard_freq();
        let trials = freq.ceil() as u32;
        for i in 0..trials {
            let p = (freq - i as f32).clamp(0.0, 1.0);
            if ctx.rng.random::<f32>() < p {
                let lane = Lane::ALL[ctx.rng.random_range(0..Lane::ALL.len())];
                let z = start_z + ctx.rng.random::<f32>() * SEGMENT_LENGTH;
                let pos = Vec3::new(lane.offset(), SURF_HEIGHT, z);
                shards.push(ctx.spawn(EntityKind::Shard, lane, pos));
            }
        }

        Self {
            start_z,
            clouds,
            shards,
        }
    }

    pub fn trailing_edge(&self) -> f32 {
        self.start_z + SEGMENT_LENGTH
    }
}

/// The full set of live segments, rear to front
#[derive(Debug, Clone, Default)]
pub struct SegmentField {
    segments: Vec<Segment>,
}

impl SegmentField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any existing terrain and tile a fresh field forward from
    /// the despawn boundary
    pub fn regenerate(&mut self, difficulty: &DifficultyCurve, ctx: &mut SpawnCtx) {
        self.clear(ctx.events);
        for i in 0..SEGMENT_COUNT {
            let start_z = DESPAWN_DISTANCE + i as f32 * SEGMENT_LENGTH;
            self.segments.push(Segment::generate(start_z, difficulty, ctx));
        }
    }

    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        for segment in &mut self.segments {
            segment.clouds.clear(events);
            segment.shards.clear(events);
        }
        self.segments.clear();
    }

    /// Scroll the terrain toward the player and recycle segments that fell
    /// behind the despawn boundary, keeping the live count constant
    pub fn advance(&mut self, distance: f32, difficulty: &DifficultyCurve, ctx: &mut SpawnCtx) {
        for segment in &mut self.segments {
            segment.start_z -= distance;
            segment.clouds.advance(-distance);
            segment.shards.advance(-distance);
        }

        while self
            .segments
            .first()
            .is_some_and(|s| s.trailing_edge() <= DESPAWN_DISTANCE)
        {
            let mut retired = self.segments.remove(0);
            retired.clouds.clear(ctx.events);
            retired.shards.clear(ctx.events);

            // Append immediately beyond the frontmost so the tiling stays
            // contiguous with no gaps or overlaps
            let front = self
                .segments
                .last()
                .map(|s| s.trailing_edge())
                .unwrap_or(DESPAWN_DISTANCE);
            self.segments.push(Segment::generate(front, difficulty, ctx));
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Every live cloud and shard, rear to front
    pub fn iter_entities(&self) -> impl Iterator<Item = &Entity> {
        self.segments
            .iter()
            .flat_map(|s| s.clouds.iter().chain(s.shards.iter()))
    }

    /// Shards only, mutable (magnet attraction)
    pub fn iter_shards_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.segments.iter_mut().flat_map(|s| s.shards.iter_mut())
    }

    /// Pull a single entity out by id (collision resolution)
    pub fn remove_entity(&mut self, id: u32) -> Option<Entity> {
        for segment in &mut self.segments {
            if let Some(e) = segment.clouds.remove(id) {
                return Some(e);
            }
            if let Some(e) = segment.shards.remove(id) {
                return Some(e);
            }
        }
        None
    }

    /// Whether a spawn position would sit on top of existing terrain
    fn is_position_occupied(&self, pos: Vec3) -> bool {
        for segment in &self.segments {
            for cloud in segment.clouds.iter() {
                if plane_distance(cloud.pos, pos) < CLOUD_CLEARANCE {
                    return true;
                }
            }
            for shard in segment.shards.iter() {
                if plane_distance(shard.pos, pos) < COLLECTIBLE_CLEARANCE {
                    return true;
                }
            }
        }
        false
    }
}

/// One power-up spawn attempt. No-ops when at the live cap, when every lane
/// is taken, when the rolled position is occupied, or when the chance gate
/// fails - the next attempt comes on the same fixed cadence regardless.
pub fn try_spawn_power_up(power_ups: &mut EntityTrack, field: &SegmentField, ctx: &mut SpawnCtx) {
    if power_ups.len() >= MAX_LIVE_POWER_UPS {
        return;
    }

    // Lanes not already holding a live power-up
    let lanes: Vec<Lane> = Lane::ALL
        .into_iter()
        .filter(|lane| power_ups.iter().all(|p| p.lane != *lane))
        .collect();
    if lanes.is_empty() {
        return;
    }
    let lane = lanes[ctx.rng.random_range(0..lanes.len())];

    let z = SPAWN_DISTANCE + ctx.rng.random_range(-POWER_UP_Z_SCATTER..POWER_UP_Z_SCATTER);
    let pos = Vec3::new(lane.offset(), SURF_HEIGHT, z);

    if field.is_position_occupied(pos)
        || power_ups
            .iter()
            .any(|p| plane_distance(p.pos, pos) < COLLECTIBLE_CLEARANCE)
    {
        return;
    }

    if let Some(kind) = PowerUpRegistry::pick_config(ctx.rng) {
        log::debug!("power-up spawn: {kind:?} lane {lane:?} z {z:.1}");
        power_ups.push(ctx.spawn(EntityKind::PowerUp(kind), lane, pos));
    }
}
