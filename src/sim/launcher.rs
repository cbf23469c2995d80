//! The catapult
//!
//! Picks up a resting actor near it, charges power while the fire button is
//! held, and throws the actor along the current aim. Actors are always passed
//! in by the caller; the catapult only remembers the id of its payload.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::terrain::Plateau;
use crate::aim_vector;
use crate::settings::LauncherSettings;

/// Index of the first actor the catapult at `x` can pick up
///
/// Candidates sit within `range` of `x` (inclusive), are not flying and are
/// still alive.
pub fn find_pickup_candidate(actors: &[Actor], x: f32, range: (f32, f32)) -> Option<usize> {
    actors.iter().position(|actor| {
        let ax = actor.position().x;
        x + range.0 <= ax && ax <= x + range.1 && !actor.in_flight() && actor.is_alive()
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    /// Base of the catapult; `y` is the plateau ground
    pub pos: Vec2,
    /// Degrees above horizontal
    pub aim_angle: f32,
    /// Current launch speed
    pub power: f32,
    pub powering_up: bool,
    pub armed: bool,
    time_loading: f32,
    payload: Option<u32>,
    plateau: Plateau,
    settings: LauncherSettings,
}

impl Launcher {
    pub fn new(settings: LauncherSettings, plateau: Plateau, x: f32) -> Self {
        Self {
            pos: Vec2::new(x, plateau.height),
            aim_angle: settings.initial_aim_angle,
            power: settings.min_power,
            powering_up: false,
            armed: true,
            time_loading: 0.0,
            payload: None,
            plateau,
            settings,
        }
    }

    #[inline]
    pub fn payload(&self) -> Option<u32> {
        self.payload
    }

    #[inline]
    pub fn plateau(&self) -> &Plateau {
        &self.plateau
    }

    /// Where a loaded actor sits
    pub fn payload_seat(&self) -> Vec2 {
        self.pos + Vec2::from(self.settings.payload_offset)
    }

    /// Where a fired actor starts its flight
    pub fn launch_point(&self) -> Vec2 {
        self.pos + Vec2::from(self.settings.launch_offset)
    }

    pub fn move_left(&mut self) {
        let min_x = self.plateau.left + self.settings.margin_left;
        self.pos.x = min_x.max(self.pos.x - self.settings.move_step);
    }

    pub fn move_right(&mut self) {
        let max_x = self.plateau.right - self.settings.margin_right;
        self.pos.x = max_x.min(self.pos.x + self.settings.move_step);
    }

    pub fn aim_up(&mut self) {
        self.aim_angle = (self.aim_angle + 1.0).min(self.settings.max_aim_angle);
    }

    pub fn aim_down(&mut self) {
        self.aim_angle = (self.aim_angle - 1.0).max(self.settings.min_aim_angle);
    }

    /// Launch velocity along the current aim with speed `length`
    pub fn aim_vector(&self, length: f32) -> Vec2 {
        aim_vector(self.aim_angle, length)
    }

    pub fn start_powering_up(&mut self) {
        if self.armed {
            self.powering_up = true;
        }
    }

    /// Charge power and run the reload timer
    pub fn update(&mut self, dt: f32) {
        if self.powering_up {
            self.power = (self.power + dt * self.settings.power_increase)
                .min(self.settings.max_power);
        }
        if !self.armed {
            self.time_loading += dt;
            if self.time_loading >= self.settings.reload_delay {
                self.time_loading = 0.0;
                self.armed = true;
            }
        }
    }

    /// Reload animation progress in `[0, 1)`; `0.0` while armed
    pub fn reload_progress(&self) -> f32 {
        if self.armed || self.settings.reload_delay <= 0.0 {
            0.0
        } else {
            (self.time_loading / self.settings.reload_delay).min(1.0)
        }
    }

    /// Load the nearest pickable actor, or unload the current payload
    ///
    /// Returns the id of the actor that was loaded. Unloading is refused
    /// while the catapult hangs past the left edge of its plateau.
    pub fn try_load(&mut self, actors: &mut [Actor]) -> Option<u32> {
        if !self.armed {
            return None;
        }

        if let Some(id) = self.payload {
            if self.pos.x >= self.plateau.left {
                let ground = Vec2::new(self.payload_seat().x, self.pos.y);
                if let Some(actor) = actors.iter_mut().find(|a| a.id == id) {
                    actor.set_position(ground);
                }
                self.payload = None;
                log::debug!("unloaded actor {}", id);
            }
            return None;
        }

        let index = find_pickup_candidate(actors, self.pos.x, self.settings.pickup_range)?;
        let actor = &mut actors[index];
        actor.set_position(self.payload_seat());
        self.payload = Some(actor.id);
        log::debug!("loaded actor {}", actor.id);
        Some(actor.id)
    }

    /// Keep the payload in its seat after the catapult moves
    pub fn seat_payload(&self, actors: &mut [Actor]) {
        if let Some(id) = self.payload {
            let seat = self.payload_seat();
            if let Some(actor) = actors.iter_mut().find(|a| a.id == id) {
                actor.set_position(seat);
            }
        }
    }

    /// Throw the payload and start reloading
    ///
    /// Returns the id of the launched actor. An armed but empty catapult
    /// still fires and has to reload.
    pub fn fire(&mut self, actors: &mut [Actor]) -> Option<u32> {
        if !self.armed {
            return None;
        }

        let mut launched = None;
        if let Some(id) = self.payload.take() {
            let start = self.launch_point();
            let velocity = self.aim_vector(self.power);
            if let Some(actor) = actors.iter_mut().find(|a| a.id == id) {
                actor.set_position(start);
                actor.launch(velocity.x, velocity.y);
                log::debug!(
                    "fired actor {} at {:.0} deg, power {:.0}",
                    id,
                    self.aim_angle,
                    self.power
                );
                launched = Some(id);
            }
        }

        self.power = self.settings.min_power;
        self.powering_up = false;
        self.armed = false;
        self.time_loading = 0.0;
        launched
    }
}
