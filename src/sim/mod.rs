//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per scheduling callback, no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Aabb, padded_overlap};
pub use snapshot::{RenderSnapshot, ScreenRect};
pub use state::{EndCause, GameEvent, Obstacle, Particle, Player, Pursuer, RunPhase, WorldState};
pub use tick::tick;
