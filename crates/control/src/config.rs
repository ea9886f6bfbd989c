//! Swerve module configuration
//!
//! Hardware identifiers are per module; mechanics and loop gains are usually
//! shared by all modules of a drivetrain.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use swerve_core::ModuleConstants;
use thiserror::Error;

use crate::pidf::PidfConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid module constants: {0:?}")]
    InvalidConstants(ModuleConstants),

    #[error("invalid {name} controller: {reason}")]
    InvalidController { name: &'static str, reason: String },

    #[error("{what} {id} is used by more than one module")]
    DuplicateId { what: &'static str, id: u32 },
}

/// Hardware identifiers and sensor orientation of one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub drive_motor_channel: u32,
    pub turning_motor_channel: u32,
    pub drive_encoder_port: u32,
    pub turning_encoder_port: u32,
    #[serde(default)]
    pub drive_encoder_reversed: bool,
    #[serde(default)]
    pub turning_encoder_reversed: bool,
}

impl ModuleConfig {
    pub fn new(
        drive_motor_channel: u32,
        turning_motor_channel: u32,
        drive_encoder_port: u32,
        turning_encoder_port: u32,
    ) -> Self {
        Self {
            drive_motor_channel,
            turning_motor_channel,
            drive_encoder_port,
            turning_encoder_port,
            drive_encoder_reversed: false,
            turning_encoder_reversed: false,
        }
    }

    /// Set sensor reversal flags
    pub fn with_reversed(mut self, drive: bool, turning: bool) -> Self {
        self.drive_encoder_reversed = drive;
        self.turning_encoder_reversed = turning;
        self
    }
}

/// Mechanics and feedback gains of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    pub constants: ModuleConstants,
    /// Drive velocity loop: (m/s measured, m/s target) to output
    pub drive_controller: PidfConfig,
    /// Turning angle loop: (rad measured, rad target) to output
    pub turning_controller: PidfConfig,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            constants: ModuleConstants::default(),
            drive_controller: PidfConfig::p(1.0).with_limits(-1.0, 1.0),
            turning_controller: PidfConfig::p(1.0).with_limits(-1.0, 1.0),
        }
    }
}

impl ModuleSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.constants.is_valid() {
            return Err(ConfigError::InvalidConstants(self.constants));
        }
        self.drive_controller
            .validate()
            .map_err(|reason| ConfigError::InvalidController { name: "drive", reason })?;
        self.turning_controller
            .validate()
            .map_err(|reason| ConfigError::InvalidController { name: "turning", reason })?;
        Ok(())
    }
}

/// Reject configurations where two modules would claim the same identifier
pub fn check_unique_ids<'a>(
    modules: impl IntoIterator<Item = &'a ModuleConfig>,
) -> Result<(), ConfigError> {
    let mut motors = HashSet::new();
    let mut sensors = HashSet::new();
    for module in modules {
        for id in [module.drive_motor_channel, module.turning_motor_channel] {
            if !motors.insert(id) {
                return Err(ConfigError::DuplicateId { what: "motor channel", id });
            }
        }
        for id in [module.drive_encoder_port, module.turning_encoder_port] {
            if !sensors.insert(id) {
                return Err(ConfigError::DuplicateId { what: "sensor port", id });
            }
        }
    }
    Ok(())
}
