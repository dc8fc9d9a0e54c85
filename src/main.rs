//! Dash Runner headless entry point
//!
//! Drives the engine with a jittery synthetic clock and a simple autopilot,
//! then prints the final snapshot as JSON.
//!
//! Usage: `dash-runner [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dash_runner::consts::*;
    use dash_runner::sim::ObjectKind;
    use dash_runner::{Action, Engine, KeyState, Settings, SimError};

    /// Frame intervals cycled by the synthetic clock (seconds)
    const FRAME_JITTER: [f64; 6] = [0.016, 0.017, 0.0167, 0.033, 0.016, 0.008];
    const DEFAULT_SECONDS: f64 = 30.0;
    /// Jump when a hazard's leading edge is this close ahead
    const AUTOPILOT_LOOKAHEAD: f32 = 60.0;

    pub fn main() -> Result<(), SimError> {
        env_logger::init();
        log::info!("Dash Runner (headless) starting...");

        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => load_settings(&path)?,
            None => Settings::default(),
        };
        let seconds = args
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(DEFAULT_SECONDS);

        let mut engine = Engine::from_settings(&settings)?;
        run(&mut engine, seconds);

        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        Ok(())
    }

    /// A missing file falls back to defaults, a malformed one is fatal
    fn load_settings(path: &str) -> Result<Settings, SimError> {
        match Settings::load(path) {
            Ok(settings) => Ok(settings),
            Err(SimError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Settings file {} not found, using defaults", path);
                Ok(Settings::default())
            }
            Err(e) => Err(e),
        }
    }

    fn run(engine: &mut Engine, seconds: f64) {
        let mut keys = KeyState::new();
        let mut now = 0.0_f64;
        let mut last_report = 0.0;
        engine.start(now);

        for &interval in FRAME_JITTER.iter().cycle() {
            now += interval;
            if now > seconds {
                break;
            }
            keys.set(Action::Jump, hazard_ahead(engine));
            engine.frame(now, &keys);

            if now - last_report >= 1.0 {
                last_report = now;
                log::info!(
                    "t={:.1}s level={} progress={:.1}% attempts={}",
                    now,
                    engine.current_level(),
                    engine.progress(),
                    engine.attempts()
                );
            }
        }

        log::info!(
            "Finished after {} ticks on level `{}`",
            engine.ticks(),
            engine.level().name()
        );
    }

    /// True when a hazard in the primary player's lane is about to reach it
    fn hazard_ahead(engine: &Engine) -> bool {
        let player = engine.primary();
        if !player.alive {
            return false;
        }
        let front = player.pos.x + player.size();
        engine.objects().iter().any(|o| {
            let gap = o.pos.x - front;
            o.kind == ObjectKind::Hazard
                && o.is_collidable()
                && (0.0..AUTOPILOT_LOOKAHEAD).contains(&gap)
                && (o.pos.y - player.pos.y).abs() < OBJECT_SIZE
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), dash_runner::SimError> {
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
}
