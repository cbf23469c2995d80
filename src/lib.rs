//! Save the Dodos - flight and terrain collision core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, flight, collisions, catapult)
//! - `settings`: Data-driven physics and launcher tuning

pub mod settings;
pub mod sim;

pub use settings::{LauncherSettings, PhysicsSettings, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 200.0;
    /// Horizontal speed lost per update (0.7%)
    pub const AIR_RESISTANCE: f32 = 0.007;
    /// Flight runs three times faster than wall-clock time
    pub const FLIGHT_TIME_SCALE: f32 = 3.0;

    /// Terrain tile size
    pub const TILE_WIDTH: f32 = 100.0;
    pub const TILE_HEIGHT: f32 = 100.0;

    pub const INITIAL_ACTORS: u32 = 20;
}

/// Unit-length direction `angle_deg` degrees above the +x axis, scaled to `length`
#[inline]
pub fn aim_vector(angle_deg: f32, length: f32) -> Vec2 {
    let theta = angle_deg.to_radians();
    Vec2::new(length * theta.cos(), length * theta.sin())
}
