//! Module state and position value types
//!
//! [`ModuleState`] is both the commanded target handed down by the drivetrain
//! and the measured state read back from the module. [`ModulePosition`] is the
//! odometry snapshot.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::angle::Rotation2d;

/// Wheel speed and heading of one swerve module
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleState {
    /// Signed wheel surface speed (m/s)
    pub speed: f64,
    /// Module heading
    pub angle: Rotation2d,
}

impl ModuleState {
    pub fn new(speed: f64, angle: Rotation2d) -> Self {
        Self { speed, angle }
    }

    /// Pick the equivalent target that needs the least steering travel.
    ///
    /// If reaching `self.angle` from `current` takes more than a quarter turn,
    /// the wheel is instead pointed the opposite way and driven backwards. A
    /// difference of exactly π/2 keeps the original target.
    pub fn optimize(self, current: Rotation2d) -> ModuleState {
        let delta = current.delta_to(self.angle).radians();
        if delta.abs() > FRAC_PI_2 {
            ModuleState {
                speed: -self.speed,
                angle: self.angle + Rotation2d::HALF_TURN,
            }
        } else {
            self
        }
    }

    /// Velocity vector of the wheel contact patch in the module frame
    pub fn velocity_vector(&self) -> Vector2<f64> {
        Vector2::new(self.speed * self.angle.cos(), self.speed * self.angle.sin())
    }
}

/// Distance driven and heading of one swerve module
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModulePosition {
    /// Accumulated wheel travel (m), signed by direction
    pub distance: f64,
    /// Module heading
    pub angle: Rotation2d,
}

impl ModulePosition {
    pub fn new(distance: f64, angle: Rotation2d) -> Self {
        Self { distance, angle }
    }
}
