//! Drive mechanics of a swerve module
//!
//! Keeps raw encoder resolution and gearing separate from the metres that the
//! rest of the drivetrain works in.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mechanical constants shared by every module of a drivetrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConstants {
    /// Drive encoder counts per motor revolution
    pub encoder_cpr: f64,
    /// Motor revolutions per wheel revolution
    pub gear_ratio: f64,
    /// Wheel diameter (m)
    pub wheel_diameter: f64,
}

impl Default for ModuleConstants {
    fn default() -> Self {
        Self {
            encoder_cpr: 2048.0,
            gear_ratio: 6.75,
            wheel_diameter: 0.1016, // 4 in
        }
    }
}

impl ModuleConstants {
    pub fn new(encoder_cpr: f64, gear_ratio: f64, wheel_diameter: f64) -> Self {
        Self { encoder_cpr, gear_ratio, wheel_diameter }
    }

    /// Distance travelled by the wheel surface in one wheel revolution (m)
    pub fn wheel_circumference(&self) -> f64 {
        PI * self.wheel_diameter
    }

    /// Convert drive encoder counts to linear wheel distance (m).
    ///
    /// Also converts a count rate (counts/s) to a linear speed (m/s).
    pub fn counts_to_distance(&self, counts: f64) -> f64 {
        let motor_rotations = counts / self.encoder_cpr;
        let wheel_rotations = motor_rotations / self.gear_ratio;
        wheel_rotations * self.wheel_circumference()
    }

    /// Inverse of [`counts_to_distance`](Self::counts_to_distance)
    pub fn distance_to_counts(&self, distance: f64) -> f64 {
        distance / self.wheel_circumference() * self.gear_ratio * self.encoder_cpr
    }

    /// True when every constant is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.encoder_cpr, self.gear_ratio, self.wheel_diameter]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}
