//! Ordered collections of live entities
//!
//! One track owns every live entity of a given role (a segment's clouds, a
//! segment's shards, the global power-up pool). Iteration order is entity-id
//! order by construction: ids are allocated monotonically and tracks only
//! append, so determinism needs no extra sorting.

use super::state::{Entity, GameEvent};

/// A set of live entities advanced and retired together
#[derive(Debug, Clone, Default)]
pub struct EntityTrack {
    entities: Vec<Entity>,
}

impl EntityTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Shift every entity along the forward axis (negative = toward player)
    pub fn advance(&mut self, dz: f32) {
        for entity in &mut self.entities {
            entity.pos.z += dz;
        }
    }

    /// Retire entities behind the despawn boundary, emitting destroy events
    pub fn retire_behind(&mut self, boundary_z: f32, events: &mut Vec<GameEvent>) {
        self.entities.retain(|e| {
            if e.pos.z < boundary_z {
                events.push(GameEvent::EntityDestroyed { id: e.id });
                false
            } else {
                true
            }
        });
    }

    /// Remove a single entity by id (collision resolution)
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Drop everything, emitting destroy events so renderer side-tables clean up
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        for entity in self.entities.drain(..) {
            events.push(GameEvent::EntityDestroyed { id: entity.id });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityKind;
    use glam::Vec3;

    fn shard(id: u32, z: f32) -> Entity {
        Entity {
            id,
            kind: EntityKind::Shard,
            lane: crate::sim::state::Lane::Center,
            pos: Vec3::new(0.0, 0.5, z),
        }
    }

    #[test]
    fn test_advance_shifts_z() {
        let mut track = EntityTrack::new();
        track.push(shard(1, 10.0));
        track.advance(-2.5);
        assert!((track.iter().next().unwrap().pos.z - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_retire_behind_emits_destroys() {
        let mut track = EntityTrack::new();
        track.push(shard(1, -11.0));
        track.push(shard(2, 5.0));
        let mut events = Vec::new();
        track.retire_behind(-10.0, &mut events);
        assert_eq!(track.len(), 1);
        assert!(matches!(events[..], [GameEvent::EntityDestroyed { id: 1 }]));
    }

    #[test]
    fn test_remove_by_id() {
        let mut track = EntityTrack::new();
        track.push(shard(1, 0.0));
        track.push(shard(2, 1.0));
        assert!(track.remove(3).is_none());
        let removed = track.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(track.len(), 1);
    }
}
