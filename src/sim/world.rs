//! Fixed timestep simulation tick
//!
//! The world owns the terrain, the catapult and every actor, and advances
//! them in a fixed order: catapult input, catapult timers, then actors by id.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorEvent};
use super::launcher::Launcher;
use super::terrain::{Heightfield, Plateau, TerrainError};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub aim_up: bool,
    pub aim_down: bool,
    /// Pick up (or put down) an actor
    pub load: bool,
    /// Fire button pressed: start charging
    pub start_power: bool,
    /// Fire button released: throw
    pub fire: bool,
}

/// Everything the simulation advances
#[derive(Debug, Clone)]
pub struct World {
    pub terrain: Heightfield,
    pub settings: Settings,
    pub plateaus: Vec<Plateau>,
    pub launcher: Launcher,
    /// Sorted by id
    pub actors: Vec<Actor>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Set up the first plateau with the catapult and a flock of resting actors
    pub fn new(terrain: Heightfield, settings: Settings, seed: u64) -> Result<Self, TerrainError> {
        let plateaus = terrain.plateaus();
        let first = *plateaus.first().ok_or(TerrainError::NoPlateau)?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let launcher_x = first.random_x(&mut rng, settings.launcher.margin_right);
        let launcher = Launcher::new(settings.launcher.clone(), first, launcher_x);

        let mut world = Self {
            terrain,
            settings,
            plateaus,
            launcher,
            actors: Vec::new(),
            time_ticks: 0,
            rng,
            next_id: 1,
        };
        for _ in 0..world.settings.initial_actors {
            world.spawn_actor();
        }

        log::info!(
            "World ready: {} plateaus, {} actors on plateau {} (seed {})",
            world.plateaus.len(),
            world.actors.len(),
            first.number,
            seed
        );
        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a resting actor at a random spot on the catapult's plateau
    pub fn spawn_actor(&mut self) -> u32 {
        let plateau = *self.launcher.plateau();
        let x = plateau.random_x(&mut self.rng, self.settings.launcher.margin_right);
        let id = self.next_entity_id();
        self.actors.push(Actor::new(id, Vec2::new(x, plateau.height)));
        id
    }

    pub fn actor(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Actors that have not hit a wall
    pub fn surviving_actors(&self) -> usize {
        self.actors.iter().filter(|a| a.is_alive()).count()
    }

    pub fn actors_in_flight(&self) -> usize {
        self.actors.iter().filter(|a| a.in_flight()).count()
    }
}

/// Advance the world by one timestep, returning the flights that ended
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<ActorEvent> {
    world.time_ticks += 1;

    let launcher = &mut world.launcher;
    if input.move_left {
        launcher.move_left();
    }
    if input.move_right {
        launcher.move_right();
    }
    if input.aim_up {
        launcher.aim_up();
    }
    if input.aim_down {
        launcher.aim_down();
    }
    if input.load {
        launcher.try_load(&mut world.actors);
    }
    if input.start_power {
        launcher.start_powering_up();
    }
    if input.fire {
        launcher.fire(&mut world.actors);
    }
    launcher.update(dt);
    launcher.seat_payload(&mut world.actors);

    let mut events = Vec::new();
    for actor in &mut world.actors {
        if let Some(event) = actor.update(dt, &world.terrain, &world.settings.physics) {
            events.push(event);
        }
    }
    events
}

/// Turns variable frame times into fixed [`SIM_DT`] ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time; runs `step(SIM_DT)` for each whole tick
    /// (at most [`MAX_SUBSTEPS`]) and returns how many ran
    ///
    /// Non-finite frame times count as zero. Whatever is still owed after the
    /// substep cap is dropped rather than carried into later frames.
    pub fn advance(&mut self, frame_dt: f32, mut step: impl FnMut(f32)) -> u32 {
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if self.accumulator >= SIM_DT {
            log::debug!("Falling behind, dropping {:.3}s of simulation", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::ActorStatus;

    /// Pit, a 200-high plateau, then a 500-high cliff
    fn terrain() -> Heightfield {
        Heightfield::from_tile_stacks(100.0, 100.0, &[0, 2, 2, 2, 2, 2, 5, 5, 5, 5]).unwrap()
    }

    fn world(seed: u64) -> World {
        let settings = Settings {
            initial_actors: 5,
            ..Settings::default()
        };
        World::new(terrain(), settings, seed).unwrap()
    }

    #[test]
    fn test_world_setup() {
        let world = world(12345);
        assert_eq!(world.plateaus.len(), 2);
        assert_eq!(world.actors.len(), 5);
        assert_eq!(world.surviving_actors(), 5);
        assert_eq!(world.actors_in_flight(), 0);

        let first = world.plateaus[0];
        for actor in &world.actors {
            assert_eq!(actor.status(), ActorStatus::Resting);
            assert!(first.contains(actor.position().x));
            assert_eq!(actor.position().y, 200.0);
        }
        assert_eq!(world.launcher.pos.y, 200.0);
        assert!(world.actors.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_world_without_ground_is_rejected() {
        let terrain = Heightfield::new(100.0, vec![0.0; 5]).unwrap();
        let err = World::new(terrain, Settings::default(), 1).unwrap_err();
        assert_eq!(err, TerrainError::NoPlateau);
    }

    #[test]
    fn test_resting_world_is_static() {
        let mut world = world(7);
        let before = world.actors.clone();
        for _ in 0..120 {
            assert!(tick(&mut world, &TickInput::default(), SIM_DT).is_empty());
        }
        assert_eq!(world.actors, before);
        assert_eq!(world.time_ticks, 120);
    }

    #[test]
    fn test_launch_until_flight_ends() {
        let mut world = world(99);
        // Park the catapult on top of the first actor
        let target = world.actors[0].position().x;
        world.launcher.pos.x = target;

        tick(
            &mut world,
            &TickInput {
                load: true,
                ..Default::default()
            },
            SIM_DT,
        );
        let loaded = world.launcher.payload().expect("an actor in range");

        tick(
            &mut world,
            &TickInput {
                start_power: true,
                ..Default::default()
            },
            SIM_DT,
        );
        tick(
            &mut world,
            &TickInput {
                fire: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(world.actors_in_flight(), 1);

        let mut ended = Vec::new();
        for _ in 0..10_000 {
            ended.extend(tick(&mut world, &TickInput::default(), SIM_DT));
            if !ended.is_empty() {
                break;
            }
        }
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].id(), loaded);
        assert_eq!(world.actors_in_flight(), 0);

        let actor = world.actor(loaded).unwrap();
        assert_eq!(actor.position(), ended[0].position());
        match ended[0] {
            ActorEvent::Landed { position, .. } => {
                assert_eq!(actor.status(), ActorStatus::Landed);
                assert_eq!(position.y, world.terrain.ground_level(position.x));
            }
            ActorEvent::Destroyed { .. } => {
                assert_eq!(actor.status(), ActorStatus::Destroyed);
                assert_eq!(world.surviving_actors(), 4);
            }
        }
    }

    #[test]
    fn test_payload_follows_catapult() {
        let mut world = world(3);
        world.launcher.pos.x = world.actors[0].position().x;
        tick(
            &mut world,
            &TickInput {
                load: true,
                ..Default::default()
            },
            SIM_DT,
        );
        let id = world.launcher.payload().unwrap();

        tick(
            &mut world,
            &TickInput {
                move_right: true,
                ..Default::default()
            },
            SIM_DT,
        );
        let seat = world.launcher.payload_seat();
        assert_eq!(world.actor(id).unwrap().position(), seat);
    }

    #[test]
    fn test_determinism() {
        let mut a = world(4242);
        let mut b = world(4242);
        assert_eq!(a.actors, b.actors);

        let script = [
            TickInput {
                load: true,
                ..Default::default()
            },
            TickInput {
                aim_up: true,
                start_power: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                fire: true,
                ..Default::default()
            },
        ];
        for input in script.iter().chain(std::iter::repeat_n(&TickInput::default(), 600)) {
            assert_eq!(tick(&mut a, input, SIM_DT), tick(&mut b, input, SIM_DT));
        }
        assert_eq!(a.actors, b.actors);
        assert_eq!(a.launcher.pos, b.launcher.pos);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut stepper = FixedStep::new();
        let mut ticks = 0;
        assert_eq!(stepper.advance(SIM_DT * 0.5, |_| ticks += 1), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.6, |_| ticks += 1), 1);
        assert_eq!(ticks, 1);
        assert!(stepper.alpha() < 0.5);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut stepper = FixedStep::new();
        let mut dts = Vec::new();
        let ran = stepper.advance(10.0, |dt| dts.push(dt));
        assert_eq!(ran, MAX_SUBSTEPS);
        assert!(dts.iter().all(|&dt| dt == SIM_DT));
    }

    #[test]
    fn test_fixed_step_ignores_negative_frames() {
        let mut stepper = FixedStep::new();
        assert_eq!(stepper.advance(-1.0, |_| {}), 0);
        assert_eq!(stepper.alpha(), 0.0);
    }

    #[test]
    fn test_fixed_step_recovers_from_nan_frame() {
        let mut stepper = FixedStep::new();
        assert_eq!(stepper.advance(f32::NAN, |_| {}), 0);
        assert_eq!(stepper.advance(f32::INFINITY, |_| {}), 0);
        assert_eq!(stepper.alpha(), 0.0);
        assert_eq!(stepper.advance(SIM_DT * 3.5, |_| {}), 3);
        assert!(stepper.alpha().is_finite());
    }

    #[test]
    fn test_fixed_step_drops_backlog_under_slow_frames() {
        let mut stepper = FixedStep::new();
        for _ in 0..1000 {
            assert_eq!(stepper.advance(MAX_FRAME_DT, |_| {}), MAX_SUBSTEPS);
            assert!(stepper.alpha() < 1.0);
        }
        // Back to normal frame times, no burst of catch-up ticks
        assert_eq!(stepper.advance(SIM_DT * 1.5, |_| {}), 1);
    }

    #[test]
    fn test_spawned_ids_are_unique() {
        let mut world = world(1);
        let id = world.spawn_actor();
        assert_eq!(id, 6);
        let actor = world.actor(id).unwrap();
        assert_eq!(actor.status(), ActorStatus::Resting);
        assert_eq!(actor.position().y, 200.0);
    }
}
