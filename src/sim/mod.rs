//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (authored object order, player slot order)
//! - No rendering, timing or platform dependencies

pub mod collision;
pub mod level;
pub mod particle;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{Rect, intersects};
pub use level::{Level, LevelGenerator, LevelRegistry, StandardGenerator};
pub use particle::Particle;
pub use player::{Bounds, GravityDir, Mode, MotionState, Player, SpeedIndex};
pub use state::World;
pub use tick::{TickOutcome, tick};
pub use track::{ObjectKind, SolidPolicy, TrackObject};
