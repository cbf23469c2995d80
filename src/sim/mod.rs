//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod launcher;
pub mod terrain;
pub mod world;

pub use actor::{Actor, ActorEvent, ActorStatus};
pub use collision::{FlightStep, Impact, ImpactKind, advance, resolve_impact};
pub use launcher::{Launcher, find_pickup_candidate};
pub use terrain::{Heightfield, Plateau, TerrainError, TerrainQuery};
pub use world::{FixedStep, TickInput, World, tick};
