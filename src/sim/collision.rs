//! Collision detection
//!
//! Detection is a pure query over entity positions; the tick applies the
//! resulting resolutions afterward. Keeping the two apart means no entity is
//! removed while the scan is still walking the tracks, and resolutions apply
//! in entity-id order regardless of track layout.

use glam::Vec3;

use super::state::{Entity, EntityKind};
use crate::consts::COLLISION_RADIUS;
use crate::plane_distance_sq;

/// One entity the player touched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
}

/// Scan entities against the player position on the x/z plane.
/// Height never matters: everything rides the surf plane.
pub fn resolve<'a, I>(player_pos: Vec3, entities: I) -> Vec<Resolution>
where
    I: Iterator<Item = &'a Entity>,
{
    let radius_sq = COLLISION_RADIUS * COLLISION_RADIUS;
    entities
        .filter(|e| plane_distance_sq(e.pos, player_pos) < radius_sq)
        .map(|e| Resolution {
            id: e.id,
            kind: e.kind,
            pos: e.pos,
        })
        .collect()
}
