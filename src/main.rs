//! Save the Dodos headless runner
//!
//! Builds a demo staircase map, throws a handful of dodos off the first
//! plateau with increasing power and logs where each flight ends.
//! Pass a settings JSON path as the first argument to override the tuning.
//! Set `RUST_LOG=debug` to trace every collision resolution.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;

    use save_the_dodos::Settings;
    use save_the_dodos::consts::{SIM_DT, TILE_HEIGHT, TILE_WIDTH};
    use save_the_dodos::sim::{ActorEvent, FixedStep, Heightfield, TickInput, World, tick};

    /// Tile stacks per column: a pit, then rising plateaus
    const DEMO_MAP: [u32; 24] = [
        0, 0, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6, 6,
    ];

    const SEED: u64 = 0x5EED_D0D0;

    /// Ticks spent charging the catapult for each throw
    const CHARGE_TICKS: [u32; 5] = [15, 40, 65, 90, 120];

    /// Simulated frame time fed to the fixed-step accumulator
    const FRAME_DT: f32 = 1.0 / 30.0;

    pub fn run(settings: Settings) -> Result<(), Box<dyn Error>> {
        let terrain = Heightfield::from_tile_stacks(TILE_WIDTH, TILE_HEIGHT, &DEMO_MAP)?;
        let mut world = World::new(terrain, settings, SEED)?;
        let mut stepper = FixedStep::new();

        for (throw, &charge) in CHARGE_TICKS.iter().enumerate() {
            let plateau = *world.launcher.plateau();
            let Some(target) = world
                .actors
                .iter()
                .filter(|a| a.is_alive() && !a.in_flight() && plateau.contains(a.position().x))
                .map(|a| a.position().x)
                .next()
            else {
                log::info!("No dodos left on plateau {}", plateau.number);
                break;
            };

            // Roll the catapult until the dodo is in the pickup window
            let (near, far) = world.settings.launcher.pickup_range;
            for _ in 0..1000 {
                let x = world.launcher.pos.x;
                let input = if x < target - far {
                    TickInput {
                        move_right: true,
                        ..Default::default()
                    }
                } else if x > target - near {
                    TickInput {
                        move_left: true,
                        ..Default::default()
                    }
                } else {
                    break;
                };
                tick(&mut world, &input, SIM_DT);
            }

            while !world.launcher.armed {
                tick(&mut world, &TickInput::default(), SIM_DT);
            }
            let load = TickInput {
                load: true,
                ..Default::default()
            };
            tick(&mut world, &load, SIM_DT);
            let Some(id) = world.launcher.payload() else {
                log::warn!("Throw {}: nothing to load near x={:.1}", throw + 1, target);
                continue;
            };

            let power_up = TickInput {
                start_power: true,
                ..Default::default()
            };
            tick(&mut world, &power_up, SIM_DT);
            for _ in 0..charge {
                tick(&mut world, &TickInput::default(), SIM_DT);
            }
            log::info!(
                "Throw {}: dodo {} at {:.0} deg, power {:.0}",
                throw + 1,
                id,
                world.launcher.aim_angle,
                world.launcher.power
            );
            let fire = TickInput {
                fire: true,
                ..Default::default()
            };
            let mut events = tick(&mut world, &fire, SIM_DT);

            // Real-time frames until the flight settles
            let mut frames = 0;
            while world.actors_in_flight() > 0 && frames < 10_000 {
                stepper.advance(FRAME_DT, |dt| {
                    events.extend(tick(&mut world, &TickInput::default(), dt));
                });
                frames += 1;
            }

            for event in events {
                match event {
                    ActorEvent::Landed { id, position } => {
                        log::info!("Dodo {} landed at ({:.1}, {:.1})", id, position.x, position.y)
                    }
                    ActorEvent::Destroyed { id, position } => {
                        log::info!("Dodo {} hit a cliff at ({:.1}, {:.1})", id, position.x, position.y)
                    }
                }
            }
        }

        log::info!(
            "{} of {} dodos survived after {} ticks",
            world.surviving_actors(),
            world.actors.len(),
            world.time_ticks
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Save the Dodos (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match save_the_dodos::Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => save_the_dodos::Settings::default(),
    };

    if let Err(e) = demo::run(settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
