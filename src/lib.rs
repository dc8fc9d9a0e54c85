//! Dash Runner - A side-scrolling obstacle runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, track objects, collisions, levels)
//! - `engine`: Fixed-timestep frame loop and lifecycle (start/pause/reset, respawn, level advance)
//! - `platform`: Input state contract consumed by the simulation
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use engine::{Engine, Snapshot};
pub use error::SimError;
pub use platform::input::{Action, InputSource, KeyState};
pub use settings::{LevelSpec, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Viewport dimensions
    pub const VIEW_WIDTH: f32 = 854.0;
    pub const VIEW_HEIGHT: f32 = 480.0;

    /// Shared resting lines for every player slot (adjusted by player offset)
    pub const GROUND_Y: f32 = 380.0;
    pub const CEILING_Y: f32 = 100.0;

    /// Downward acceleration magnitude (pixels/s²)
    pub const GRAVITY: f32 = 2000.0;

    /// Base horizontal scroll speed (pixels/s)
    pub const BASE_SPEED: f32 = 400.0;
    /// Scroll speed multipliers addressed by a player's speed index
    pub const SPEED_MULTIPLIERS: [f32; 4] = [0.8, 1.0, 1.3, 1.6];
    pub const DEFAULT_SPEED_INDEX: usize = 1;

    /// Player defaults
    pub const PLAYER_X: f32 = 150.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const MINI_PLAYER_SIZE: f32 = 25.0;
    /// Resting-line offset of the second player slot
    pub const DUAL_OFFSET: f32 = 200.0;

    /// Mode force laws (pixels/s and pixels/s²)
    pub const CUBE_JUMP_VELOCITY: f32 = 750.0;
    pub const ROBOT_JUMP_VELOCITY: f32 = 950.0;
    pub const UFO_FLAP_VELOCITY: f32 = 600.0;
    pub const SHIP_THRUST: f32 = 2000.0;
    pub const WAVE_SPEED: f32 = 600.0;
    /// Seconds before a spider can flip again
    pub const SPIDER_FLIP_COOLDOWN: f32 = 0.2;

    /// Vertical velocity applied by a boost orb (always toward world-up)
    pub const BOOST_VELOCITY: f32 = -900.0;

    /// Track object footprint
    pub const OBJECT_SIZE: f32 = 40.0;
    /// Objects further than this outside the viewport are skipped
    pub const CULL_MARGIN: f32 = 50.0;
    /// Lead object x at or below which the level is complete
    pub const ADVANCE_THRESHOLD: f32 = -50.0;

    /// Death effects
    pub const DEATH_PARTICLES: usize = 30;
    /// Death particle velocity range per axis is ±half of this
    pub const PARTICLE_SPREAD: f32 = 400.0;
    pub const SHAKE_DURATION: f32 = 0.3;
    /// Real-time seconds between a death and the respawn
    pub const RESPAWN_DELAY: f64 = 0.8;

    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f64 = 0.25;

    /// Default level track length (pixels of scroll)
    pub const DEFAULT_LEVEL_LENGTH: f32 = 5000.0;
}

/// Horizontal scroll speed (pixels/s) for a validated speed index
#[inline]
pub fn scroll_speed(index: sim::SpeedIndex) -> f32 {
    consts::BASE_SPEED * index.multiplier()
}
