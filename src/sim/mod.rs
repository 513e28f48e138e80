//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One polled clock per tick (`GameState::time_ms`), never wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod difficulty;
pub mod powerups;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{Resolution, resolve};
pub use combo::ComboTracker;
pub use difficulty::DifficultyCurve;
pub use powerups::{PowerUpKind, PowerUpRegistry};
pub use spawn::{Segment, SegmentField};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, HudSnapshot, Lane};
pub use tick::{TickInput, tick};
pub use track::EntityTrack;
