//! Frame loop and lifecycle
//!
//! Owns the fixed-timestep accumulator and every transition that spans more
//! than one tick, such as the delayed respawn after a death.

pub mod timer;

use serde::Serialize;

use crate::consts::*;
use crate::error::SimError;
use crate::platform::input::{Action, InputSource};
use crate::settings::Settings;
use crate::sim::{
    Level, LevelGenerator, LevelRegistry, Particle, Player, StandardGenerator, TickOutcome,
    TrackObject, World, tick,
};
use timer::DeferredTask;

const TIMESTEP: f64 = SIM_DT as f64;

/// Read-only view for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub players: &'a [Player],
    /// Objects inside the drawing window
    pub objects: Vec<&'a TrackObject>,
    pub particles: &'a [Particle],
    pub progress: f32,
    pub attempts: u32,
    pub level_index: usize,
    pub level_name: &'a str,
    pub shake: f32,
    pub background_hue: f32,
    pub running: bool,
}

/// The simulation engine, driven once per display frame
#[derive(Debug, Clone)]
pub struct Engine {
    registry: LevelRegistry,
    world: World,
    running: bool,
    /// Elapsed real time not yet consumed by ticks (seconds)
    accumulator: f64,
    /// Timestamp of the previous frame (seconds)
    last_time: f64,
    respawn: DeferredTask,
    respawn_delay: f64,
    max_frame_delta: f64,
}

impl Engine {
    pub fn new(settings: &Settings, registry: LevelRegistry) -> Result<Self, SimError> {
        settings.validate()?;
        let primary = Player::new(0.0, settings.spawn_mode, settings.speed_index);
        let secondary = settings
            .dual
            .then(|| Player::new(DUAL_OFFSET, settings.spawn_mode, settings.speed_index));
        let mut world = World::new(settings.seed, primary, secondary);
        world.load_level(0, registry.level(0));

        Ok(Self {
            registry,
            world,
            running: false,
            accumulator: 0.0,
            last_time: 0.0,
            respawn: DeferredTask::new(),
            respawn_delay: settings.respawn_delay,
            max_frame_delta: settings.max_frame_delta,
        })
    }

    /// Build the registry from `settings.levels` with `generator`, then the engine
    pub fn with_generator<G: LevelGenerator + ?Sized>(
        settings: &Settings,
        generator: &mut G,
    ) -> Result<Self, SimError> {
        let registry = LevelRegistry::generate(&settings.levels, generator)?;
        Self::new(settings, registry)
    }

    /// Engine over the stock level layout
    pub fn from_settings(settings: &Settings) -> Result<Self, SimError> {
        Self::with_generator(settings, &mut StandardGenerator)
    }

    /// (Re)load the current level and begin consuming frames
    pub fn start(&mut self, now: f64) {
        self.respawn.cancel();
        self.load(self.world.level_index);
        self.accumulator = 0.0;
        self.last_time = now;
        self.running = true;
        log::info!("Engine started on level {}", self.world.level_index);
    }

    /// Stop consuming frames and reset the simulation state
    pub fn pause(&mut self) {
        self.running = false;
        if self.respawn.cancel() {
            log::debug!("Pending respawn cancelled by pause");
        }
        self.load(self.world.level_index);
        self.accumulator = 0.0;
        self.world.shake = 0.0;
        log::info!("Engine paused");
    }

    /// Reload the current level from its authored layout
    pub fn reset(&mut self) {
        self.respawn.cancel();
        self.load(self.world.level_index);
        log::info!("Level {} reset", self.world.level_index);
    }

    /// Per-frame entry point
    ///
    /// `now` is a monotonic timestamp in seconds. Drains the accumulator in
    /// fixed ticks and returns whether the host should keep scheduling frames.
    pub fn frame(&mut self, now: f64, input: &impl InputSource) -> bool {
        if !self.running {
            return false;
        }

        let delta = (now - self.last_time).max(0.0).min(self.max_frame_delta);
        self.last_time = self.last_time.max(now);

        if self.respawn.poll(now) {
            log::debug!("Respawning on level {}", self.world.level_index);
            self.load(self.world.level_index);
        }

        self.accumulator += delta;
        while self.accumulator >= TIMESTEP {
            let outcome = tick(&mut self.world, input.pressed(Action::Jump), SIM_DT);
            self.accumulator -= TIMESTEP;
            self.handle_outcome(outcome, now);
        }

        true
    }

    fn handle_outcome(&mut self, outcome: TickOutcome, now: f64) {
        if outcome.deaths > 0 && self.respawn.schedule(now + self.respawn_delay) {
            log::debug!("Respawn scheduled for t={:.3}", now + self.respawn_delay);
        }
        if outcome.level_complete {
            self.advance_level();
        }
    }

    fn advance_level(&mut self) {
        let next = self.registry.next_index(self.world.level_index);
        // The full reload below already revives everyone
        self.respawn.cancel();
        self.load(next);
        log::info!(
            "Level complete, advancing to {} (`{}`)",
            next,
            self.registry.level(next).name()
        );
    }

    fn load(&mut self, index: usize) {
        let level = self.registry.level(index);
        self.world.load_level(index, level);
        log::info!(
            "Loaded level {} (`{}`, {} objects)",
            index,
            level.name(),
            level.objects().len()
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn level(&self) -> &Level {
        self.registry.level(self.world.level_index)
    }

    pub fn current_level(&self) -> usize {
        self.world.level_index
    }

    pub fn players(&self) -> &[Player] {
        &self.world.players
    }

    pub fn primary(&self) -> &Player {
        self.world.primary()
    }

    pub fn objects(&self) -> &[TrackObject] {
        &self.world.objects
    }

    pub fn particles(&self) -> &[Particle] {
        &self.world.particles
    }

    pub fn progress(&self) -> f32 {
        self.world.progress()
    }

    pub fn attempts(&self) -> u32 {
        self.world.attempts
    }

    pub fn shake(&self) -> f32 {
        self.world.shake
    }

    pub fn background_hue(&self) -> f32 {
        self.world.background_hue()
    }

    /// Ticks executed since construction
    pub fn ticks(&self) -> u64 {
        self.world.time_ticks
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn.is_pending()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            players: &self.world.players,
            objects: self.world.objects.iter().filter(|o| o.is_visible()).collect(),
            particles: &self.world.particles,
            progress: self.progress(),
            attempts: self.attempts(),
            level_index: self.world.level_index,
            level_name: self.level().name(),
            shake: self.shake(),
            background_hue: self.background_hue(),
            running: self.running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::KeyState;
    use crate::settings::LevelSpec;

    const IDLE: KeyState = KeyState::new();

    fn level(name: &str, objects: Vec<TrackObject>) -> Level {
        let spec = LevelSpec {
            name: name.to_string(),
            ..LevelSpec::default()
        };
        Level::new(&spec, objects).unwrap()
    }

    fn engine_with(settings: &Settings, levels: Vec<Level>) -> Engine {
        Engine::new(settings, LevelRegistry::new(levels).unwrap()).unwrap()
    }

    /// Reference object far ahead so the level never completes on its own
    fn far_ref() -> TrackObject {
        TrackObject::hazard(100_000.0, 0.0)
    }

    /// Drive small frames until exactly one more tick has run
    fn step_tick(engine: &mut Engine, t: &mut f64) {
        let before = engine.ticks();
        while engine.ticks() == before {
            *t += 0.004;
            assert!(engine.frame(*t, &IDLE));
        }
        assert_eq!(engine.ticks(), before + 1);
    }

    /// Drive small frames up to `until`
    fn run_until(engine: &mut Engine, t: &mut f64, until: f64) {
        while *t + 0.004 <= until {
            *t += 0.004;
            engine.frame(*t, &IDLE);
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        assert!(!engine.is_running());
        assert!(!engine.frame(1.0, &IDLE));
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn test_accumulator_drains_fixed_ticks() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        engine.start(10.0);

        assert!(engine.frame(10.105, &IDLE));
        assert_eq!(engine.ticks(), 6);

        // Jittery frames still add up to wall-clock time
        let mut t = 10.105;
        for i in 0..60 {
            t += if i % 2 == 0 { 0.010 } else { 0.0233 };
            engine.frame(t, &IDLE);
        }
        let expected = ((t - 10.0) / TIMESTEP).floor() as u64;
        assert!(engine.ticks().abs_diff(expected) <= 1);
    }

    #[test]
    fn test_rejects_invalid_timing() {
        let registry = || LevelRegistry::new(vec![level("a", vec![far_ref()])]).unwrap();
        let frozen = Settings {
            max_frame_delta: -1.0,
            ..Settings::default()
        };
        assert!(matches!(
            Engine::new(&frozen, registry()),
            Err(SimError::InvalidTiming { field: "max_frame_delta", .. })
        ));

        let backwards = Settings {
            respawn_delay: -5.0,
            ..Settings::default()
        };
        assert!(Engine::from_settings(&backwards).is_err());
        assert!(Engine::new(&Settings::default(), registry()).is_ok());
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        engine.start(0.0);
        engine.frame(30.0, &IDLE);
        let max_ticks = (MAX_FRAME_DELTA / TIMESTEP).ceil() as u64;
        assert!(engine.ticks() <= max_ticks);
    }

    #[test]
    fn test_clock_going_backwards_consumes_nothing() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        engine.start(5.0);
        engine.frame(4.0, &IDLE);
        assert_eq!(engine.ticks(), 0);
        // Time is measured from the latest timestamp seen
        engine.frame(5.105, &IDLE);
        assert_eq!(engine.ticks(), 6);
    }

    #[test]
    fn test_jump_input_reaches_player() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        engine.start(0.0);
        let mut keys = KeyState::new();
        keys.press(Action::Jump);
        engine.frame(0.02, &keys);
        assert_eq!(engine.ticks(), 1);
        assert_eq!(engine.primary().velocity, -CUBE_JUMP_VELOCITY);
    }

    #[test]
    fn test_death_respawns_after_real_time_delay() {
        let spike = TrackObject::hazard(PLAYER_X + 50.0, GROUND_Y);
        let mut engine =
            engine_with(&Settings::default(), vec![level("a", vec![far_ref(), spike])]);
        let mut t = 0.0;
        engine.start(t);

        while engine.primary().alive {
            step_tick(&mut engine, &mut t);
        }
        let died_at = t;
        assert_eq!(engine.attempts(), 2);
        assert_eq!(engine.particles().len(), DEATH_PARTICLES);
        assert!(engine.respawn_pending());
        assert!(engine.shake() > 0.0);

        // Still dead just before the deadline, while the track keeps scrolling
        run_until(&mut engine, &mut t, died_at + RESPAWN_DELAY - 0.01);
        assert!(!engine.primary().alive);
        assert!(engine.objects()[1].pos.x < PLAYER_X);

        run_until(&mut engine, &mut t, died_at + RESPAWN_DELAY + 0.01);
        assert!(engine.primary().alive);
        assert!(!engine.respawn_pending());
        assert_eq!(engine.attempts(), 2);
        // Reloaded from the authored layout, at most a couple of ticks of scroll
        let spike_x = engine.objects()[1].pos.x;
        assert!(spike_x > PLAYER_X + 35.0 && spike_x <= PLAYER_X + 50.0);
    }

    #[test]
    fn test_simultaneous_dual_deaths_share_one_respawn() {
        let settings = Settings {
            dual: true,
            ..Settings::default()
        };
        let objects = vec![
            far_ref(),
            TrackObject::hazard(PLAYER_X + 50.0, GROUND_Y),
            TrackObject::hazard(PLAYER_X + 50.0, GROUND_Y - DUAL_OFFSET),
        ];
        let mut engine = engine_with(&settings, vec![level("a", objects)]);
        let mut t = 0.0;
        engine.start(t);

        while engine.players().iter().all(|p| p.alive) {
            step_tick(&mut engine, &mut t);
        }
        assert!(engine.players().iter().all(|p| !p.alive));
        assert_eq!(engine.attempts(), 3);
        assert_eq!(engine.particles().len(), 2 * DEATH_PARTICLES);
        assert!(engine.respawn_pending());

        let deadline = engine.respawn.deadline().unwrap();
        run_until(&mut engine, &mut t, deadline + 0.01);
        assert!(engine.players().iter().all(|p| p.alive));
        assert!(!engine.respawn_pending());
    }

    #[test]
    fn test_pause_cancels_pending_respawn() {
        let mut engine = engine_with(&Settings::default(), vec![level("a", vec![far_ref()])]);
        let mut t = 0.0;
        engine.start(t);
        step_tick(&mut engine, &mut t);

        assert!(engine.world.kill_player(0));
        engine.handle_outcome(
            TickOutcome {
                deaths: 1,
                level_complete: false,
            },
            t,
        );
        let stale_deadline = engine.respawn.deadline().unwrap();

        engine.pause();
        assert!(!engine.is_running());
        assert!(!engine.respawn_pending());
        assert!(engine.primary().alive);
        assert!(engine.particles().is_empty());
        assert!(!engine.frame(t + 0.1, &IDLE));

        // Restart before the old deadline and run well past it
        t += 0.2;
        engine.start(t);
        let restart_ticks = engine.ticks();
        run_until(&mut engine, &mut t, stale_deadline + 0.5);

        // The track kept scrolling from the restart; nothing reloaded it
        let ticks_run = (engine.ticks() - restart_ticks) as f32;
        let expected_x = 100_000.0 - BASE_SPEED * SIM_DT * ticks_run;
        assert!((engine.objects()[0].pos.x - expected_x).abs() < 1.0);
        assert_eq!(engine.attempts(), 2);
    }

    #[test]
    fn test_reset_reloads_current_level() {
        let mut engine = engine_with(
            &Settings::default(),
            vec![level("a", vec![far_ref(), TrackObject::boost(900.0, 100.0)])],
        );
        let mut t = 0.0;
        engine.start(t);
        run_until(&mut engine, &mut t, 0.5);
        assert_ne!(engine.objects(), engine.level().objects());

        engine.reset();
        assert_eq!(engine.objects(), engine.level().objects());
        assert!(engine.is_running());
    }

    #[test]
    fn test_level_advance_wraps_and_restores_layout() {
        let lead = |extra: f32| {
            vec![
                TrackObject::hazard(ADVANCE_THRESHOLD + 5.0, 0.0),
                TrackObject::boost(1000.0 + extra, 100.0),
            ]
        };
        let mut engine = engine_with(
            &Settings::default(),
            vec![
                level("a", lead(0.0)),
                level("b", lead(10.0)),
                level("c", lead(20.0)),
            ],
        );
        let mut t = 0.0;
        engine.start(t);
        assert_eq!(engine.current_level(), 0);

        // Each level's reference object crosses the threshold on its first tick
        for expected in [1, 2, 0] {
            step_tick(&mut engine, &mut t);
            assert_eq!(engine.current_level(), expected);
            assert_eq!(engine.objects(), engine.registry().level(expected).objects());
            assert!(engine.particles().is_empty());
        }
        assert_eq!(engine.level().name(), "a");
    }

    #[test]
    fn test_level_advance_cancels_pending_respawn() {
        let mut engine = engine_with(
            &Settings::default(),
            vec![
                level("a", vec![TrackObject::hazard(ADVANCE_THRESHOLD + 5.0, 0.0)]),
                level("b", vec![far_ref()]),
            ],
        );
        engine.start(0.0);
        assert!(engine.world.kill_player(0));
        engine.handle_outcome(
            TickOutcome {
                deaths: 1,
                level_complete: false,
            },
            0.0,
        );
        assert!(engine.respawn_pending());

        engine.frame(0.02, &IDLE);
        assert_eq!(engine.current_level(), 1);
        assert!(!engine.respawn_pending());
        assert!(engine.primary().alive);
    }

    #[test]
    fn test_empty_level_never_completes() {
        let mut engine = engine_with(&Settings::default(), vec![level("void", Vec::new())]);
        let mut t = 0.0;
        engine.start(t);
        run_until(&mut engine, &mut t, 1.0);
        assert_eq!(engine.current_level(), 0);
        assert_eq!(engine.progress(), 100.0);
    }

    #[test]
    fn test_from_settings_and_snapshot() {
        let mut engine = Engine::from_settings(&Settings::default()).unwrap();
        assert_eq!(engine.registry().len(), 3);
        engine.start(0.0);
        engine.frame(0.1, &IDLE);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.attempts, 1);
        assert_eq!(snapshot.level_name, "Foundations");
        assert!(snapshot.objects.iter().all(|o| o.is_visible()));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["players"][0]["mode"], "cube");
        assert_eq!(json["running"], true);
    }
}
