//! Scrolling track objects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Collision semantics of a track object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Block; outcome decided by the active `SolidPolicy`
    Solid,
    /// Spike, kills on contact
    Hazard,
    /// Jump orb, launches the player upward
    Boost,
}

/// How contact with a `Solid` object resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidPolicy {
    /// Same as a hazard
    #[default]
    Lethal,
    /// Pushed out vertically through the nearer face, velocity zeroed
    Block,
    /// No effect
    Passthrough,
}

/// A scrolling obstacle or pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackObject {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObjectKind,
    /// Overrides the level's solid policy for this object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid_policy: Option<SolidPolicy>,
    /// Generator data, opaque to the engine
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TrackObject {
    pub fn new(x: f32, y: f32, kind: ObjectKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::splat(OBJECT_SIZE),
            kind,
            solid_policy: None,
            payload: serde_json::Value::Null,
            active: true,
        }
    }

    pub fn hazard(x: f32, y: f32) -> Self {
        Self::new(x, y, ObjectKind::Hazard)
    }

    pub fn boost(x: f32, y: f32) -> Self {
        Self::new(x, y, ObjectKind::Boost)
    }

    pub fn solid(x: f32, y: f32) -> Self {
        Self::new(x, y, ObjectKind::Solid)
    }

    pub fn with_policy(mut self, policy: SolidPolicy) -> Self {
        self.solid_policy = Some(policy);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Scroll left at `speed` pixels/s
    #[inline]
    pub fn scroll(&mut self, speed: f32, dt: f32) {
        self.pos.x -= speed * dt;
    }

    /// Still eligible for collision tests (not inactive, not scrolled out behind)
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.active && self.pos.x >= -CULL_MARGIN
    }

    /// Inside the drawing window
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.is_collidable() && self.pos.x <= VIEW_WIDTH + CULL_MARGIN
    }

    /// Effective solid policy given the level default
    #[inline]
    pub fn policy(&self, level_default: SolidPolicy) -> SolidPolicy {
        self.solid_policy.unwrap_or(level_default)
    }
}
