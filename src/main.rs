//! Survivor Sim headless runner
//!
//! Replays a scripted walk through the simulation at 60 Hz and logs where the
//! session ended up. Usage: `survivor-sim [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use survivor_sim::Tuning;
    use survivor_sim::sim::{FrameDriver, GameState, Geometry, HeadlessScene};

    const DEFAULT_SEED: u64 = 12345;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const RUN_SECONDS: f64 = 30.0;

    /// (time in seconds, key, pressed)
    const SCRIPT: &[(f64, &str, bool)] = &[
        (0.5, "w", true),
        (4.0, "d", true),
        (6.0, "w", false),
        (9.0, "ArrowDown", true),
        (11.0, "d", false),
        (15.0, "a", true),
        (18.0, "ArrowDown", false),
        (24.0, "a", false),
    ];

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        Tuning::from_json(&json).map_err(|e| format!("Invalid tuning in {}: {}", path, e))
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Survivor Sim (headless) starting...");

        let args: Vec<String> = std::env::args().skip(1).collect();

        let tuning = match load_tuning(args.first().map(String::as_str)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };

        let seed = match args.get(1).map(|s| s.parse::<u64>()) {
            Some(Ok(seed)) => seed,
            Some(Err(_)) => {
                log::warn!("Seed {:?} is not a number, using {}", args[1], DEFAULT_SEED);
                DEFAULT_SEED
            }
            None => DEFAULT_SEED,
        };

        let mut scene = HeadlessScene::new();
        let mut state = GameState::new(seed, &tuning, &mut scene);
        let mut driver = FrameDriver::new();

        let frames = (RUN_SECONDS * 1000.0 / FRAME_MS) as u64;
        let mut script = SCRIPT.iter().peekable();

        for frame in 0..=frames {
            let now_ms = frame as f64 * FRAME_MS;
            while let Some(&&(at, key, pressed)) = script.peek() {
                if at * 1000.0 > now_ms {
                    break;
                }
                if pressed {
                    state.on_key_down(key);
                } else {
                    state.on_key_up(key);
                }
                script.next();
            }

            driver.frame(&mut state, &mut scene, now_ms);
            for event in state.drain_events() {
                log::trace!("{:?}", event);
            }

            if state.is_over() {
                break;
            }
        }

        let pos = state.hero.position();
        log::info!(
            "After {:.1}s ({} ticks): hero at ({:.1}, {:.1}) hp {:.0}/{:.0}, level {} ({} exp)",
            state.time_ms / 1000.0,
            state.ticks,
            pos.x,
            pos.z,
            state.hero.stats.hp,
            state.hero.stats.max_hp,
            state.hero.level(),
            state.hero.exp()
        );
        log::info!(
            "{} enemies alive, {} pickups on the ground, {} sectors streamed ({} visuals live, {} terrain)",
            state.enemies.len(),
            state.terrain.consumables().len(),
            state.terrain.sector_count(),
            scene.live_count(),
            scene.count_where(|g| matches!(g, Geometry::Sector { .. }))
        );
        if state.is_over() {
            log::info!("Session ended: hero died");
        }

        state.dispose();
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly; there is no runner here
}
