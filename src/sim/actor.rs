//! Launched actors (the dodos)
//!
//! An actor is a point mass with a status. Position and velocity are plain
//! data; whatever draws the bird reads them, it does not own them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, FlightStep, ImpactKind};
use super::terrain::TerrainQuery;
use crate::settings::PhysicsSettings;

/// Flight status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorStatus {
    /// On the ground or held by the catapult
    #[default]
    Resting,
    /// Moving under gravity and drag
    InFlight,
    /// Came down safely
    Landed,
    /// Hit a cliff face
    Destroyed,
}

/// Emitted when a flight ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorEvent {
    Landed { id: u32, position: Vec2 },
    Destroyed { id: u32, position: Vec2 },
}

impl ActorEvent {
    pub fn id(&self) -> u32 {
        match *self {
            ActorEvent::Landed { id, .. } | ActorEvent::Destroyed { id, .. } => id,
        }
    }

    pub fn position(&self) -> Vec2 {
        match *self {
            ActorEvent::Landed { position, .. } | ActorEvent::Destroyed { position, .. } => {
                position
            }
        }
    }
}

/// A launchable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pos: Vec2,
    vel: Vec2,
    status: ActorStatus,
}

impl Actor {
    /// A resting actor at `pos`
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            status: ActorStatus::Resting,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn status(&self) -> ActorStatus {
        self.status
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        self.status == ActorStatus::InFlight
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status != ActorStatus::Destroyed
    }

    /// Move the actor without flying it (carried, placed, picked up)
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Start a flight with velocity `(dx, dy)`
    ///
    /// Destroyed actors stay down, and a zero vector is ignored.
    pub fn launch(&mut self, dx: f32, dy: f32) {
        let vel = Vec2::new(dx, dy);
        if !self.is_alive() || vel == Vec2::ZERO || !vel.is_finite() {
            return;
        }
        self.vel = vel;
        self.status = ActorStatus::InFlight;
    }

    /// Advance one tick
    ///
    /// Returns an event on the tick the flight ends. Actors that are not in
    /// flight are left untouched.
    pub fn update<T: TerrainQuery + ?Sized>(
        &mut self,
        dt: f32,
        terrain: &T,
        physics: &PhysicsSettings,
    ) -> Option<ActorEvent> {
        if self.status != ActorStatus::InFlight {
            return None;
        }
        let dt = dt * physics.time_scale;
        if dt.is_nan() || dt <= 0.0 {
            return None;
        }

        match collision::advance(self.pos, self.vel * dt, terrain) {
            FlightStep::Clear(pos) => {
                self.pos = pos;
                self.vel.y -= physics.gravity * dt;
                self.vel.x *= 1.0 - physics.drag;
                None
            }
            FlightStep::Impact(impact) => {
                self.pos = impact.point;
                self.vel = Vec2::ZERO;
                let event = match impact.kind {
                    ImpactKind::Landed => {
                        self.status = ActorStatus::Landed;
                        ActorEvent::Landed {
                            id: self.id,
                            position: self.pos,
                        }
                    }
                    ImpactKind::Destroyed => {
                        self.status = ActorStatus::Destroyed;
                        ActorEvent::Destroyed {
                            id: self.id,
                            position: self.pos,
                        }
                    }
                };
                log::debug!("actor {}: {:?}", self.id, event);
                Some(event)
            }
        }
    }
}
