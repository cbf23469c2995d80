//! Tuning settings
//!
//! Loaded from JSON; every field falls back to its default so a settings file
//! only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// Flight physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Fraction of horizontal speed lost per update
    pub drag: f32,
    /// Multiplier applied to `dt` before integrating
    pub time_scale: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            drag: consts::AIR_RESISTANCE,
            time_scale: consts::FLIGHT_TIME_SCALE,
        }
    }
}

impl PhysicsSettings {
    /// Physics with `time_scale = 1.0`, so `update(dt)` integrates exactly `dt`
    pub fn unscaled(gravity: f32, drag: f32) -> Self {
        Self {
            gravity,
            drag,
            time_scale: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(SettingsError::Invalid {
                field: "physics.gravity",
                value: self.gravity,
            });
        }
        if !(0.0..1.0).contains(&self.drag) {
            return Err(SettingsError::Invalid {
                field: "physics.drag",
                value: self.drag,
            });
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "physics.time_scale",
                value: self.time_scale,
            });
        }
        Ok(())
    }
}

/// Catapult tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Launch speed range (units/s)
    pub min_power: f32,
    pub max_power: f32,
    /// Power gained per second while charging
    pub power_increase: f32,
    /// Aim limits and starting angle (degrees above horizontal)
    pub min_aim_angle: f32,
    pub max_aim_angle: f32,
    pub initial_aim_angle: f32,
    /// Seconds to re-arm after firing
    pub reload_delay: f32,
    /// Distance moved per left/right step
    pub move_step: f32,
    /// How far past the plateau edges the catapult may roll
    pub margin_left: f32,
    pub margin_right: f32,
    /// Pickup window relative to the catapult x
    pub pickup_range: (f32, f32),
    /// Offset of the loaded actor from the catapult
    pub payload_offset: (f32, f32),
    /// Offset of the release point from the catapult
    pub launch_offset: (f32, f32),
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            min_power: 200.0,
            max_power: 1000.0,
            power_increase: 400.0,
            min_aim_angle: 15.0,
            max_aim_angle: 75.0,
            initial_aim_angle: 45.0,
            reload_delay: 0.75,
            move_step: 15.0,
            margin_left: -40.0,
            margin_right: 110.0,
            pickup_range: (-15.0, 100.0),
            payload_offset: (2.0, 19.0),
            launch_offset: (70.0, 75.0),
        }
    }
}

impl LauncherSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.min_power.is_finite() || self.min_power <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "launcher.min_power",
                value: self.min_power,
            });
        }
        if !self.max_power.is_finite() || self.max_power < self.min_power {
            return Err(SettingsError::Invalid {
                field: "launcher.max_power",
                value: self.max_power,
            });
        }
        if !self.power_increase.is_finite() || self.power_increase < 0.0 {
            return Err(SettingsError::Invalid {
                field: "launcher.power_increase",
                value: self.power_increase,
            });
        }
        if !self.max_aim_angle.is_finite() {
            return Err(SettingsError::Invalid {
                field: "launcher.max_aim_angle",
                value: self.max_aim_angle,
            });
        }
        if !self.min_aim_angle.is_finite() || self.min_aim_angle > self.max_aim_angle {
            return Err(SettingsError::Invalid {
                field: "launcher.min_aim_angle",
                value: self.min_aim_angle,
            });
        }
        if !(self.min_aim_angle..=self.max_aim_angle).contains(&self.initial_aim_angle) {
            return Err(SettingsError::Invalid {
                field: "launcher.initial_aim_angle",
                value: self.initial_aim_angle,
            });
        }
        if !self.move_step.is_finite() || self.move_step < 0.0 {
            return Err(SettingsError::Invalid {
                field: "launcher.move_step",
                value: self.move_step,
            });
        }
        if !self.reload_delay.is_finite() || self.reload_delay < 0.0 {
            return Err(SettingsError::Invalid {
                field: "launcher.reload_delay",
                value: self.reload_delay,
            });
        }
        Ok(())
    }
}

/// All game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub launcher: LauncherSettings,
    /// Actors spawned on the first plateau
    pub initial_actors: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            launcher: LauncherSettings::default(),
            initial_actors: consts::INITIAL_ACTORS,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.physics.validate()?;
        self.launcher.validate()
    }
}
