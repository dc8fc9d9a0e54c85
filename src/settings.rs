//! Game settings and level configuration
//!
//! Loaded from JSON. Every field has a default, but anything present must be
//! valid: an unknown mode or an out-of-range speed index is a hard error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{Mode, SolidPolicy, SpeedIndex};

/// Parameters handed to the level generator for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelSpec {
    pub name: String,
    /// Logical track length (pixels of scroll)
    pub length: f32,
    /// Base background hue (degrees)
    pub theme_hue: f32,
    pub difficulty: u32,
    /// Outcome of touching a solid block in this level
    pub solid_policy: SolidPolicy,
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            length: DEFAULT_LEVEL_LENGTH,
            theme_hue: 0.0,
            difficulty: 0,
            solid_policy: SolidPolicy::Lethal,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Seed for the particle RNG
    pub seed: u64,
    /// Enable the second player slot
    pub dual: bool,
    /// Mode every player returns to on reset
    pub spawn_mode: Mode,
    /// Speed table index every player returns to on reset
    pub speed_index: SpeedIndex,
    /// Real-time seconds from a death to the respawn
    pub respawn_delay: f64,
    /// Largest frame delta fed to the accumulator (seconds)
    pub max_frame_delta: f64,
    /// Levels in play order
    pub levels: Vec<LevelSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            dual: false,
            spawn_mode: Mode::Cube,
            speed_index: SpeedIndex::default(),
            respawn_delay: RESPAWN_DELAY,
            max_frame_delta: MAX_FRAME_DELTA,
            levels: default_levels(),
        }
    }
}

fn default_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec {
            name: "Foundations".to_string(),
            theme_hue: 200.0,
            difficulty: 0,
            ..LevelSpec::default()
        },
        LevelSpec {
            name: "Ascent".to_string(),
            theme_hue: 280.0,
            difficulty: 2,
            solid_policy: SolidPolicy::Block,
            ..LevelSpec::default()
        },
        LevelSpec {
            name: "Overdrive".to_string(),
            length: 6000.0,
            theme_hue: 20.0,
            difficulty: 4,
            ..LevelSpec::default()
        },
    ]
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the timing fields serde cannot constrain
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(SimError::InvalidTiming {
                field: "max_frame_delta",
                rule: "positive",
                value: self.max_frame_delta,
            });
        }
        if !(self.respawn_delay.is_finite() && self.respawn_delay >= 0.0) {
            return Err(SimError::InvalidTiming {
                field: "respawn_delay",
                rule: "non-negative",
                value: self.respawn_delay,
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
