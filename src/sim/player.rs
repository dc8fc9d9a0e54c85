//! Player entity and movement-mode state machine
//!
//! Each mode is a distinct force law over the same vertical motion state.
//! `Mode::advance` is the pure per-mode step; `Player::update` wraps it with
//! cooldown decay and boundary clamping.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::error::SimError;

/// Movement rule-set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Grounded jump impulse, otherwise falls
    #[default]
    Cube,
    /// Continuous thrust while held, falls when released
    Ship,
    /// Flips gravity on a grounded press
    Ball,
    /// Mid-air flap on every press
    Ufo,
    /// Fixed-speed diagonal up/down, no inertia
    Wave,
    /// Cube with a stronger jump
    Robot,
    /// Teleports to the opposite boundary on press
    Spider,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Cube,
        Mode::Ship,
        Mode::Ball,
        Mode::Ufo,
        Mode::Wave,
        Mode::Robot,
        Mode::Spider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cube => "cube",
            Mode::Ship => "ship",
            Mode::Ball => "ball",
            Mode::Ufo => "ufo",
            Mode::Wave => "wave",
            Mode::Robot => "robot",
            Mode::Spider => "spider",
        }
    }

    /// Display colour (0xRRGGBB), also used for death bursts
    pub fn color(&self) -> u32 {
        match self {
            Mode::Cube => 0x00FFFF,   // cyan
            Mode::Ship => 0xFF0000,   // red
            Mode::Ball => 0xFFFF00,   // yellow
            Mode::Ufo => 0xFF00FF,    // magenta
            Mode::Wave => 0x00FF00,   // lime
            Mode::Robot => 0xFFA500,  // orange
            Mode::Spider => 0x800080, // purple
        }
    }

    /// Advance vertical motion by one step under this mode's force law
    ///
    /// Returns the unclamped result; the caller decays the cooldown and
    /// clamps to the boundaries.
    pub fn advance(self, m: MotionState, jump: bool, dt: f32, bounds: &Bounds) -> MotionState {
        let MotionState {
            mut y,
            mut velocity,
            mut gravity,
            mut cooldown,
        } = m;
        let grounded = bounds.is_grounded(y, gravity);

        match self {
            Mode::Cube | Mode::Robot => {
                let impulse = if self == Mode::Robot {
                    ROBOT_JUMP_VELOCITY
                } else {
                    CUBE_JUMP_VELOCITY
                };
                if grounded && jump {
                    velocity = -impulse * gravity.sign();
                } else {
                    velocity += GRAVITY * gravity.sign() * dt;
                    y += velocity * dt;
                }
            }
            Mode::Ship => {
                velocity += (if jump { -SHIP_THRUST } else { SHIP_THRUST }) * dt;
                y += velocity * dt;
            }
            Mode::Ball => {
                if grounded && jump {
                    gravity = gravity.flipped();
                }
                velocity += GRAVITY * gravity.sign() * dt;
                y += velocity * dt;
            }
            Mode::Ufo => {
                if jump {
                    velocity = -UFO_FLAP_VELOCITY * gravity.sign();
                }
                velocity += GRAVITY * gravity.sign() * dt;
                y += velocity * dt;
            }
            Mode::Wave => {
                y += (if jump { -WAVE_SPEED } else { WAVE_SPEED }) * dt;
            }
            Mode::Spider => {
                if jump && cooldown <= 0.0 {
                    gravity = gravity.flipped();
                    y = match gravity {
                        GravityDir::Down => bounds.ground,
                        GravityDir::Up => bounds.ceiling,
                    };
                    cooldown = SPIDER_FLIP_COOLDOWN;
                }
            }
        }

        MotionState {
            y,
            velocity,
            gravity,
            cooldown,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SimError::UnknownMode(s.to_string()))
    }
}

/// Direction gravity pulls the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityDir {
    /// Toward the ground line (+y)
    #[default]
    Down,
    /// Toward the ceiling line (-y)
    Up,
}

impl GravityDir {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            GravityDir::Down => 1.0,
            GravityDir::Up => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            GravityDir::Down => GravityDir::Up,
            GravityDir::Up => GravityDir::Down,
        }
    }
}

/// Index into `SPEED_MULTIPLIERS`, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SpeedIndex(usize);

impl SpeedIndex {
    pub fn new(index: usize) -> Result<Self, SimError> {
        if index < SPEED_MULTIPLIERS.len() {
            Ok(Self(index))
        } else {
            Err(SimError::SpeedIndexOutOfRange {
                index,
                len: SPEED_MULTIPLIERS.len(),
            })
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub fn multiplier(self) -> f32 {
        SPEED_MULTIPLIERS[self.0]
    }
}

impl Default for SpeedIndex {
    fn default() -> Self {
        Self(DEFAULT_SPEED_INDEX)
    }
}

impl TryFrom<usize> for SpeedIndex {
    type Error = SimError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<SpeedIndex> for usize {
    fn from(index: SpeedIndex) -> Self {
        index.0
    }
}

/// Vertical state touched by a mode step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub y: f32,
    pub velocity: f32,
    pub gravity: GravityDir,
    pub cooldown: f32,
}

/// Resting lines for one player slot, already shifted by its offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub ground: f32,
    pub ceiling: f32,
}

impl Bounds {
    pub fn for_offset(offset: f32) -> Self {
        Self {
            ground: GROUND_Y - offset,
            ceiling: CEILING_Y - offset,
        }
    }

    /// Resting on the boundary gravity currently pulls toward
    #[inline]
    pub fn is_grounded(&self, y: f32, gravity: GravityDir) -> bool {
        match gravity {
            GravityDir::Down => y >= self.ground,
            GravityDir::Up => y <= self.ceiling,
        }
    }
}

/// A player slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub velocity: f32,
    pub gravity: GravityDir,
    pub mode: Mode,
    pub speed_index: SpeedIndex,
    /// Smaller hitbox
    pub mini: bool,
    /// Seconds until mode re-triggers are allowed (may go negative)
    pub cooldown: f32,
    pub alive: bool,
    /// Shift of this slot's resting lines above the shared ground/ceiling
    pub offset: f32,
    spawn_mode: Mode,
    spawn_speed: SpeedIndex,
}

impl Player {
    pub fn new(offset: f32, spawn_mode: Mode, spawn_speed: SpeedIndex) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            velocity: 0.0,
            gravity: GravityDir::Down,
            mode: spawn_mode,
            speed_index: spawn_speed,
            mini: false,
            cooldown: 0.0,
            alive: true,
            offset,
            spawn_mode,
            spawn_speed,
        };
        player.reset();
        player
    }

    /// Restore spawn state; the only way to revive a dead player
    pub fn reset(&mut self) {
        self.pos = Vec2::new(PLAYER_X, GROUND_Y - self.offset);
        self.velocity = 0.0;
        self.gravity = GravityDir::Down;
        self.mode = self.spawn_mode;
        self.speed_index = self.spawn_speed;
        self.mini = false;
        self.cooldown = 0.0;
        self.alive = true;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::for_offset(self.offset)
    }

    pub fn is_grounded(&self) -> bool {
        self.bounds().is_grounded(self.pos.y, self.gravity)
    }

    pub fn size(&self) -> f32 {
        if self.mini { MINI_PLAYER_SIZE } else { PLAYER_SIZE }
    }

    pub fn hitbox(&self) -> Rect {
        let size = self.size();
        Rect::new(self.pos.x, self.pos.y, size, size)
    }

    fn motion(&self) -> MotionState {
        MotionState {
            y: self.pos.y,
            velocity: self.velocity,
            gravity: self.gravity,
            cooldown: self.cooldown,
        }
    }

    /// Advance one fixed step
    pub fn update(&mut self, jump: bool, dt: f32) {
        if !self.alive {
            return;
        }

        let bounds = self.bounds();
        let next = self.mode.advance(self.motion(), jump, dt, &bounds);

        self.pos.y = next.y;
        self.velocity = next.velocity;
        self.gravity = next.gravity;
        self.cooldown = next.cooldown - dt;
        self.clamp_to_bounds();
    }

    /// Snap onto the ground/ceiling line if past it, stopping vertical motion
    pub fn clamp_to_bounds(&mut self) {
        let bounds = self.bounds();
        if self.pos.y > bounds.ground {
            self.pos.y = bounds.ground;
            self.velocity = 0.0;
        }
        if self.pos.y < bounds.ceiling {
            self.pos.y = bounds.ceiling;
            self.velocity = 0.0;
        }
    }
}
