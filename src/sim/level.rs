//! Level definitions and the level registry
//!
//! A `Level` owns its authored object layout and never hands out mutable
//! access to it. The engine scrolls a `live_copy()`, so reloading always
//! starts from the authored positions.

use serde::{Deserialize, Serialize};

use super::track::{SolidPolicy, TrackObject};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::LevelSpec;

/// An authored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    name: String,
    /// Logical track length used to normalize progress
    length: f32,
    /// Base background hue (degrees)
    theme_hue: f32,
    difficulty: u32,
    solid_policy: SolidPolicy,
    objects: Vec<TrackObject>,
}

impl Level {
    pub fn new(spec: &LevelSpec, objects: Vec<TrackObject>) -> Result<Self, SimError> {
        let level = Self {
            name: spec.name.clone(),
            length: spec.length,
            theme_hue: spec.theme_hue,
            difficulty: spec.difficulty,
            solid_policy: spec.solid_policy,
            objects,
        };
        level.validate()?;
        Ok(level)
    }

    fn validate(&self) -> Result<(), SimError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(SimError::InvalidLevelLength {
                name: self.name.clone(),
                length: self.length,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn theme_hue(&self) -> f32 {
        self.theme_hue
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn solid_policy(&self) -> SolidPolicy {
        self.solid_policy
    }

    /// Authored layout
    pub fn objects(&self) -> &[TrackObject] {
        &self.objects
    }

    /// Deep copy of the authored layout for the live working set
    pub fn live_copy(&self) -> Vec<TrackObject> {
        self.objects.clone()
    }
}

/// Produces a level's authored object list
pub trait LevelGenerator {
    fn generate(&mut self, spec: &LevelSpec) -> Vec<TrackObject>;
}

/// Ordered, non-empty collection of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelRegistry {
    levels: Vec<Level>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<Level>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return Err(SimError::EmptyRegistry);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Run the generator once per spec, in order
    pub fn generate<G: LevelGenerator + ?Sized>(
        specs: &[LevelSpec],
        generator: &mut G,
    ) -> Result<Self, SimError> {
        let levels = specs
            .iter()
            .map(|spec| Level::new(spec, generator.generate(spec)))
            .collect::<Result<Vec<_>, _>>()?;
        let registry = Self::new(levels)?;
        for level in &registry.levels {
            log::info!(
                "Generated level `{}` (difficulty {}): {} objects over {} px",
                level.name(),
                level.difficulty(),
                level.objects().len(),
                level.length()
            );
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Never true for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Level at `index`, wrapping past the end
    pub fn level(&self, index: usize) -> &Level {
        &self.levels[index % self.levels.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

impl TryFrom<Vec<Level>> for LevelRegistry {
    type Error = SimError;

    fn try_from(levels: Vec<Level>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelRegistry> for Vec<Level> {
    fn from(registry: LevelRegistry) -> Self {
        registry.levels
    }
}

/// Stock layout: a ground-line spike run with two orbs and two blocks
///
/// Positions are authored against a 5000 px track and scaled to the spec's
/// length; each difficulty step tightens the spike spacing by 25 px.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardGenerator;

impl StandardGenerator {
    const FIRST_SPIKE: f32 = 600.0;
    const SPIKE_RUN_END: f32 = 4500.0;
    const SPIKE_SPACING: f32 = 300.0;
    const MIN_SPIKE_SPACING: f32 = 150.0;

    fn spike_spacing(difficulty: u32) -> f32 {
        (Self::SPIKE_SPACING - 25.0 * difficulty as f32).max(Self::MIN_SPIKE_SPACING)
    }
}

impl LevelGenerator for StandardGenerator {
    fn generate(&mut self, spec: &LevelSpec) -> Vec<TrackObject> {
        let scale = spec.length / DEFAULT_LEVEL_LENGTH;
        let spacing = Self::spike_spacing(spec.difficulty);
        let end = Self::SPIKE_RUN_END * scale;

        let mut objects = Vec::new();
        let mut x = Self::FIRST_SPIKE;
        while x < end {
            objects.push(TrackObject::hazard(x, GROUND_Y));
            x += spacing;
        }

        objects.push(TrackObject::boost(1500.0 * scale, 300.0));
        objects.push(TrackObject::solid(2500.0 * scale, 350.0));
        objects.push(TrackObject::boost(3500.0 * scale, 200.0));
        objects.push(TrackObject::solid(4000.0 * scale, 300.0));
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObjectKind;

    fn spec(name: &str, difficulty: u32) -> LevelSpec {
        LevelSpec {
            name: name.to_string(),
            difficulty,
            ..LevelSpec::default()
        }
    }

    #[test]
    fn test_standard_layout() {
        let objects = StandardGenerator.generate(&spec("a", 0));
        let spikes: Vec<_> = objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Hazard)
            .collect();
        // 600, 900, ..., 4200
        assert_eq!(spikes.len(), 13);
        assert_eq!(objects[0].pos.x, 600.0);
        assert!(spikes.iter().all(|o| o.pos.y == GROUND_Y));
        assert_eq!(objects.iter().filter(|o| o.kind == ObjectKind::Boost).count(), 2);
        assert_eq!(objects.iter().filter(|o| o.kind == ObjectKind::Solid).count(), 2);
    }

    #[test]
    fn test_difficulty_tightens_spacing() {
        let easy = StandardGenerator.generate(&spec("easy", 0));
        let hard = StandardGenerator.generate(&spec("hard", 4));
        assert!(hard.len() > easy.len());
        assert_eq!(hard[1].pos.x - hard[0].pos.x, 200.0);
    }

    #[test]
    fn test_registry_rejects_empty() {
        assert!(matches!(LevelRegistry::new(Vec::new()), Err(SimError::EmptyRegistry)));
    }

    #[test]
    fn test_level_rejects_bad_length() {
        let bad = LevelSpec {
            length: 0.0,
            ..spec("zero", 0)
        };
        assert!(matches!(
            Level::new(&bad, Vec::new()),
            Err(SimError::InvalidLevelLength { .. })
        ));
    }

    #[test]
    fn test_live_copy_is_independent() {
        let registry =
            LevelRegistry::generate(&[spec("a", 0)], &mut StandardGenerator).unwrap();
        let level = registry.level(0);
        let mut live = level.live_copy();
        for obj in &mut live {
            obj.scroll(BASE_SPEED, 1.0);
        }
        assert_ne!(live.as_slice(), level.objects());
        assert_eq!(level.objects()[0].pos.x, 600.0);
    }

    #[test]
    fn test_index_wraps() {
        let registry = LevelRegistry::generate(
            &[spec("a", 0), spec("b", 1), spec("c", 2)],
            &mut StandardGenerator,
        )
        .unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.next_index(2), 0);
        assert_eq!(registry.level(4).name(), "b");
        assert!(registry.get(3).is_none());

        let names: Vec<&str> = registry.iter().map(Level::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        let difficulties: Vec<u32> = registry.iter().map(Level::difficulty).collect();
        assert_eq!(difficulties, [0, 1, 2]);
    }

    #[test]
    fn test_payload_survives_live_copy() {
        let tagged =
            TrackObject::boost(1500.0, 300.0).with_payload(serde_json::json!({ "ring": 2 }));
        let level = Level::new(&spec("a", 0), vec![tagged]).unwrap();
        let mut live = level.live_copy();
        live[0].payload["ring"] = serde_json::json!(9);

        assert_eq!(level.objects()[0].payload["ring"], 2);
        assert_eq!(live[0].payload["ring"], 9);
    }

    #[test]
    fn test_registry_deserialize_validates() {
        assert!(serde_json::from_str::<LevelRegistry>("[]").is_err());
    }
}
