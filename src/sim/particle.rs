//! Cosmetic particles (no gameplay effect)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::PARTICLE_SPREAD;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, dead at <= 0
    pub life: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Spawn `count` particles at `origin` with random velocities in ±spread/2 per axis
pub fn burst<R: Rng>(rng: &mut R, origin: Vec2, color: u32, count: usize) -> Vec<Particle> {
    let half = PARTICLE_SPREAD / 2.0;
    (0..count)
        .map(|_| Particle {
            pos: origin,
            vel: Vec2::new(rng.random_range(-half..half), rng.random_range(-half..half)),
            color,
            life: 1.0,
        })
        .collect()
}

/// Age every particle and drop the dead ones
pub fn age(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.update(dt);
    }
    particles.retain(Particle::is_alive);
}
