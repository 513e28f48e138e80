//! Per-frame simulation step
//!
//! `tick` is the only mutation entry point: the host calls it once per frame
//! with that frame's input and delta, then drains events and reads a HUD
//! snapshot. Every timed behavior (combo expiry, power-up expiry, spawn
//! cadence, the game-over linger) is polled against `time_ms` inside the
//! tick, so a state that stops ticking is fully frozen.

use super::collision::resolve;
use super::spawn::{try_spawn_power_up, SpawnCtx};
use super::state::{EntityKind, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// How fast the magnet drags shards toward the board (world units/sec)
const MAGNET_PULL_SPEED: f32 = 15.0;

/// Player input sampled for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Start a run from the menu
    pub start: bool,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ms += f64::from(dt) * 1000.0;

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_run();
            }
        }
        GamePhase::Playing => tick_playing(state, input, dt),
        GamePhase::GameOver => {
            // An explicit restart skips the linger and goes straight into a
            // fresh run; otherwise fall back to the timed return to menu
            if input.start {
                state.start_run();
            } else if state.time_ms - state.game_over_at_ms >= GAME_OVER_LINGER_MS {
                state.field.clear(&mut state.events);
                state.power_ups.clear(&mut state.events);
                state.phase = GamePhase::Menu;
            }
        }
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.time_ms;

    // Lane movement first so this frame's collisions see the new lane
    if input.move_left {
        state.player_lane = state.player_lane.left();
    }
    if input.move_right {
        state.player_lane = state.player_lane.right();
    }

    // Escalation: play-time cadence and score thresholds are independent
    if now - state.last_escalation_ms >= ESCALATE_INTERVAL_MS {
        state.last_escalation_ms = now;
        state.difficulty.escalate();
        state.push_event(GameEvent::LevelUp(state.difficulty.level()));
    }
    while state.score >= f64::from(state.difficulty.level()) * LEVEL_THRESHOLD {
        state.difficulty.escalate();
        state.push_event(GameEvent::LevelUp(state.difficulty.level()));
    }

    let speed = state.effects.effective_speed(state.difficulty.speed());
    let distance = speed * dt;

    // Scroll the world toward the player
    {
        let mut ctx = SpawnCtx {
            rng: &mut state.rng,
            next_id: &mut state.next_id,
            events: &mut state.events,
        };
        state.field.advance(distance, &state.difficulty, &mut ctx);
    }
    state.power_ups.advance(-distance);
    state.power_ups.retire_behind(DESPAWN_DISTANCE, &mut state.events);

    // Power-up spawn attempt on a fixed cadence, hit or miss
    if now - state.last_power_up_attempt_ms >= POWER_UP_SPAWN_INTERVAL_MS {
        state.last_power_up_attempt_ms = now;
        let mut ctx = SpawnCtx {
            rng: &mut state.rng,
            next_id: &mut state.next_id,
            events: &mut state.events,
        };
        try_spawn_power_up(&mut state.power_ups, &state.field, &mut ctx);
    }

    let player = state.player_pos();

    // Magnet drags nearby shards toward the board until they collide
    let radius = state.effects.magnet_radius();
    if radius > 0.0 {
        for shard in state.field.iter_shards_mut() {
            let dx = player.x - shard.pos.x;
            let dz = player.z - shard.pos.z;
            let dist = (dx * dx + dz * dz).sqrt();
            if dist > 0.0 && dist < radius {
                let step = (MAGNET_PULL_SPEED * dt).min(dist);
                shard.pos.x += dx / dist * step;
                shard.pos.z += dz / dist * step;
            }
        }
    }

    // Collect every contact first, then apply in entity-id order
    let hits = resolve(player, state.field.iter_entities().chain(state.power_ups.iter()));
    for hit in hits {
        match hit.kind {
            EntityKind::Cloud { .. } => {
                if state.field.remove_entity(hit.id).is_none() {
                    continue;
                }
                state.push_event(GameEvent::EntityDestroyed { id: hit.id });
                if state.effects.has_shield() {
                    log::debug!("shield absorbed cloud {}", hit.id);
                } else {
                    state.dream_level -= CLOUD_HIT_PENALTY;
                    state.push_event(GameEvent::ObstacleHit { pos: hit.pos });
                }
            }
            EntityKind::Shard => {
                if state.field.remove_entity(hit.id).is_none() {
                    continue;
                }
                state.push_event(GameEvent::EntityDestroyed { id: hit.id });
                state.dream_level = (state.dream_level + SHARD_DREAM_RESTORE).min(DREAM_MAX);
                state.combo.increment(now);
                let points = state.add_points(SHARD_BASE_POINTS);
                state.push_event(GameEvent::ShardCollected {
                    pos: hit.pos,
                    points,
                });
            }
            EntityKind::PowerUp(kind) => {
                if state.power_ups.remove(hit.id).is_none() {
                    continue;
                }
                state.push_event(GameEvent::EntityDestroyed { id: hit.id });
                state.effects.activate(kind, now);
                state.push_event(GameEvent::PowerUpActivated(kind));
            }
        }
    }

    // Timed expiries, polled after collisions so a same-tick pickup
    // gets its full window
    state.combo.expire_if_stale(now);
    for kind in state.effects.expire(now) {
        state.push_event(GameEvent::PowerUpExpired(kind));
    }

    // Distance score accrues through the combo multiplier
    state.add_points(f64::from(dt) * f64::from(speed) * DISTANCE_POINTS_RATE);

    // Passive dream drain ends the run the same tick it bottoms out
    state.dream_level = (state.dream_level - DREAM_DRAIN_PER_SEC * dt).min(DREAM_MAX);
    if state.dream_level <= 0.0 {
        state.dream_level = 0.0;
        state.phase = GamePhase::GameOver;
        state.game_over_at_ms = now;
        state.push_event(GameEvent::GameOver {
            score: state.score,
            max_combo: state.combo.max_combo(),
        });
        log::info!(
            "game over: score {:.0}, max combo {}",
            state.score,
            state.combo.max_combo()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane_distance;
    use crate::sim::spawn::Segment;
    use crate::sim::state::{Entity, Lane};
    use crate::sim::track::EntityTrack;
    use crate::sim::PowerUpKind;
    use glam::Vec3;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_run();
        state.drain_events();
        state
    }

    /// Replace the generated terrain with a single segment holding the
    /// given entities, so collisions are fully staged
    fn stage(state: &mut GameState, clouds: Vec<Entity>, shards: Vec<Entity>) {
        let mut events = Vec::new();
        state.field.clear(&mut events);
        let mut cloud_track = EntityTrack::new();
        for c in clouds {
            cloud_track.push(c);
        }
        let mut shard_track = EntityTrack::new();
        for s in shards {
            shard_track.push(s);
        }
        state.field.segments_mut().push(Segment {
            start_z: DESPAWN_DISTANCE,
            clouds: cloud_track,
            shards: shard_track,
        });
    }

    fn cloud_at(state: &mut GameState, pos: Vec3) -> Entity {
        Entity {
            id: state.next_entity_id(),
            kind: EntityKind::Cloud { stormy: false },
            lane: Lane::Center,
            pos,
        }
    }

    fn shard_at(state: &mut GameState, pos: Vec3) -> Entity {
        Entity {
            id: state.next_entity_id(),
            kind: EntityKind::Shard,
            lane: Lane::Center,
            pos,
        }
    }

    #[test]
    fn test_menu_only_responds_to_start() {
        let mut state = GameState::new(1);
        tick(
            &mut state,
            &TickInput {
                move_left: true,
                ..Default::default()
            },
            0.016,
        );
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.player_lane, Lane::Center);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.016,
        );
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_lane_input_moves_player() {
        let mut state = playing_state(1);
        stage(&mut state, vec![], vec![]);
        tick(
            &mut state,
            &TickInput {
                move_left: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.player_lane, Lane::Left);
        tick(
            &mut state,
            &TickInput {
                move_left: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.player_lane, Lane::Left);
    }

    #[test]
    fn test_cloud_hit_drains_dream_and_spares_combo() {
        let mut state = playing_state(2);
        state.combo.increment(0.0);
        state.combo.increment(0.0);
        let pos = state.player_pos();
        let cloud = cloud_at(&mut state, pos);
        stage(&mut state, vec![cloud], vec![]);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.dream_level, DREAM_MAX - CLOUD_HIT_PENALTY);
        // Only inactivity or a full reset drops the chain, never a hit
        assert_eq!(state.combo.count(), 2);
        assert_eq!(state.combo.max_combo(), 2);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ObstacleHit { .. })));
        assert!(state.field.iter_entities().next().is_none());
    }

    #[test]
    fn test_shield_absorbs_cloud_hit() {
        let mut state = playing_state(3);
        state.effects.activate(PowerUpKind::Shield, state.time_ms);
        state.combo.increment(state.time_ms);
        let pos = state.player_pos();
        let cloud = cloud_at(&mut state, pos);
        stage(&mut state, vec![cloud], vec![]);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.dream_level, DREAM_MAX);
        assert_eq!(state.combo.count(), 1);
        let events = state.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ObstacleHit { .. })));
        // The cloud is still consumed by the contact
        assert!(state.field.iter_entities().next().is_none());
    }

    #[test]
    fn test_three_shards_build_the_combo() {
        let mut state = playing_state(4);
        state.dream_level = 50.0;
        let player = state.player_pos();
        let shards = (0..3)
            .map(|i| shard_at(&mut state, player + Vec3::new(0.0, 0.0, i as f32 * 0.1)))
            .collect();
        stage(&mut state, vec![], shards);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.combo.count(), 3);
        assert!((state.combo.multiplier() - 2.5).abs() < 1e-9);
        // 10 x 1.5 + 10 x 2.0 + 10 x 2.5
        assert!((state.score - 60.0).abs() < 1e-9);
        assert_eq!(state.dream_level, 80.0);
        let collected = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ShardCollected { .. }))
            .count();
        assert_eq!(collected, 3);
    }

    #[test]
    fn test_power_up_pickup_activates_effect() {
        let mut state = playing_state(5);
        stage(&mut state, vec![], vec![]);
        let entity = Entity {
            id: state.next_entity_id(),
            kind: EntityKind::PowerUp(PowerUpKind::Magnet),
            lane: Lane::Center,
            pos: state.player_pos(),
        };
        state.power_ups.push(entity);

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(state.effects.has_magnet());
        assert!(state.power_ups.is_empty());
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PowerUpActivated(PowerUpKind::Magnet))));
    }

    #[test]
    fn test_magnet_pulls_shards_in() {
        let mut state = playing_state(6);
        state.effects.activate(PowerUpKind::Magnet, state.time_ms);
        let shard = shard_at(&mut state, Vec3::new(2.0, SURF_HEIGHT, 6.0));
        stage(&mut state, vec![], vec![shard]);

        let before = plane_distance(Vec3::new(2.0, SURF_HEIGHT, 6.0), state.player_pos());
        tick(&mut state, &TickInput::default(), 0.1);

        let after = state
            .field
            .iter_entities()
            .next()
            .map(|e| plane_distance(e.pos, state.player_pos()))
            .unwrap();
        assert!(after < before - 1.0, "before {before}, after {after}");
    }

    #[test]
    fn test_distance_score_and_dream_drain() {
        let mut state = playing_state(7);
        stage(&mut state, vec![], vec![]);

        tick(&mut state, &TickInput::default(), 0.5);

        // 0.5 s at base speed 6: 30 points, 1 dream drained
        assert!((state.score - 30.0).abs() < 1e-6);
        assert!((state.dream_level - 99.0).abs() < 1e-4);
    }

    #[test]
    fn test_score_threshold_escalates() {
        let mut state = playing_state(8);
        stage(&mut state, vec![], vec![]);
        state.score = LEVEL_THRESHOLD;

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.difficulty.level(), 2);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp(2))));
    }

    #[test]
    fn test_time_cadence_escalates() {
        let mut state = playing_state(9);
        stage(&mut state, vec![], vec![]);
        // Hold dream and score steady so only the play-time trigger can fire
        for _ in 0..31 {
            state.dream_level = DREAM_MAX;
            state.score = 0.0;
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert_eq!(state.difficulty.level(), 2);
    }

    #[test]
    fn test_empty_dream_ends_the_run_same_tick() {
        let mut state = playing_state(10);
        stage(&mut state, vec![], vec![]);
        state.dream_level = 0.5;

        tick(&mut state, &TickInput::default(), 1.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.dream_level, 0.0);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_game_over_returns_to_menu_after_linger() {
        let mut state = playing_state(11);
        stage(&mut state, vec![], vec![]);
        state.dream_level = 0.1;
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput::default(), 2.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        tick(&mut state, &TickInput::default(), 1.1);
        assert_eq!(state.phase, GamePhase::Menu);
        // Terrain is torn down on the way out
        assert!(state.field.iter_entities().next().is_none());
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_restart_command_cuts_the_linger_short() {
        let mut state = playing_state(12);
        stage(&mut state, vec![], vec![]);
        state.dream_level = 0.1;
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.drain_events();

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.5,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.dream_level, DREAM_MAX);
        assert_eq!(state.field.segment_count(), SEGMENT_COUNT);
    }

    #[test]
    fn test_shard_restore_caps_at_dream_max() {
        let mut state = playing_state(13);
        state.dream_level = 95.0;
        let player = state.player_pos();
        let shard = shard_at(&mut state, player);
        stage(&mut state, vec![], vec![shard]);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.dream_level, DREAM_MAX);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = playing_state(99);
        let mut b = playing_state(99);
        let input = TickInput::default();
        for i in 0..300 {
            let dt = 1.0 / 60.0;
            let moved = TickInput {
                move_left: i % 40 == 0,
                move_right: i % 70 == 0,
                ..Default::default()
            };
            tick(&mut a, if i % 2 == 0 { &input } else { &moved }, dt);
            tick(&mut b, if i % 2 == 0 { &input } else { &moved }, dt);
        }
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.drain_events(), b.drain_events());
        let pa: Vec<_> = a.field.iter_entities().map(|e| (e.id, e.pos)).collect();
        let pb: Vec<_> = b.field.iter_entities().map(|e| (e.id, e.pos)).collect();
        assert_eq!(pa, pb);
    }
}
