//! Live simulation state
//!
//! `World` is the working set one tick operates on: the player slots, the
//! scrolled copy of the current level's objects, particles, and the counters
//! the presentation layer reads.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::level::Level;
use super::particle::{self, Particle};
use super::player::Player;
use super::track::{SolidPolicy, TrackObject};
use crate::consts::*;

/// Complete live state (everything a tick reads or writes)
#[derive(Debug, Clone)]
pub struct World {
    /// Player slots; slot 0 is the primary player and sets the scroll speed
    pub players: Vec<Player>,
    /// Live, scrolled copy of the current level's objects
    pub objects: Vec<TrackObject>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Attempt counter, starts at 1 and grows by one per death
    pub attempts: u32,
    /// Index of the loaded level in the registry
    pub level_index: usize,
    pub level_length: f32,
    pub theme_hue: f32,
    /// Default outcome for solid contact in this level
    pub solid_policy: SolidPolicy,
    /// Remaining screen-shake time (seconds)
    pub shake: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl World {
    pub fn new(seed: u64, primary: Player, secondary: Option<Player>) -> Self {
        let mut players = vec![primary];
        players.extend(secondary);
        Self {
            players,
            objects: Vec::new(),
            particles: Vec::new(),
            attempts: 1,
            level_index: 0,
            level_length: DEFAULT_LEVEL_LENGTH,
            theme_hue: 0.0,
            solid_policy: SolidPolicy::default(),
            shake: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn primary(&self) -> &Player {
        &self.players[0]
    }

    /// Load a fresh copy of `level` and reset players and particles
    pub fn load_level(&mut self, index: usize, level: &Level) {
        self.level_index = index;
        self.level_length = level.length();
        self.theme_hue = level.theme_hue();
        self.solid_policy = level.solid_policy();
        self.objects = level.live_copy();
        self.reset_actors();
    }

    /// Respawn every player slot and clear particles
    pub fn reset_actors(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.particles.clear();
    }

    /// Current horizontal scroll speed
    pub fn scroll_speed(&self) -> f32 {
        crate::scroll_speed(self.primary().speed_index)
    }

    /// Kill the player in `slot`
    ///
    /// Returns false (and does nothing) if it was already dead.
    pub fn kill_player(&mut self, slot: usize) -> bool {
        let Some(player) = self.players.get_mut(slot) else {
            return false;
        };
        if !player.alive {
            return false;
        }
        player.alive = false;
        let origin: Vec2 = player.pos;
        let color = player.mode.color();

        self.attempts += 1;
        self.particles
            .extend(particle::burst(&mut self.rng, origin, color, DEATH_PARTICLES));
        self.shake = SHAKE_DURATION;

        log::debug!(
            "Player {} died at ({:.1}, {:.1}), attempt {}",
            slot,
            origin.x,
            origin.y,
            self.attempts
        );
        true
    }

    /// x of the progress reference object (the first live object)
    pub fn lead_x(&self) -> Option<f32> {
        self.objects.first().map(|o| o.pos.x)
    }

    /// Progress through the level, 0-100
    pub fn progress(&self) -> f32 {
        let lead = self.lead_x().unwrap_or(0.0);
        ((self.level_length - lead) / self.level_length * 100.0).clamp(0.0, 100.0)
    }

    /// The reference object has scrolled past the advance threshold
    pub fn level_complete(&self) -> bool {
        self.lead_x().is_some_and(|x| x <= ADVANCE_THRESHOLD)
    }

    /// Background hue in degrees, drifting with progress
    pub fn background_hue(&self) -> f32 {
        (self.theme_hue + self.progress() * 3.0).rem_euclid(360.0)
    }
}
