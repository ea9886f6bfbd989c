//! Hardware and control capabilities a swerve module is assembled from
//!
//! The module controller only talks to these traits, so real devices,
//! simulated devices and test doubles are interchangeable.

use crate::angle::Rotation2d;
use crate::error::HardwareError;

// Actuators

/// Anything that accepts a normalized output command
pub trait SpeedActuator {
    /// Apply a normalized output in [-1, 1]
    fn set(&mut self, output: f64) -> Result<(), HardwareError>;

    /// Last output that was applied
    fn get(&self) -> f64;
}

/// Drive motor with an integrated relative encoder
pub trait DriveMotor: SpeedActuator {
    /// Encoder rate in counts per second
    fn rate(&self) -> Result<f64, HardwareError>;

    /// Accumulated encoder position in counts
    fn position(&self) -> Result<f64, HardwareError>;

    /// Overwrite the accumulated encoder position
    fn set_position(&mut self, counts: f64) -> Result<(), HardwareError>;
}

// Sensors

/// Absolute or relative heading sensor for the turning axis
pub trait AngleSensor {
    /// Current heading
    fn angle(&self) -> Result<Rotation2d, HardwareError>;

    /// Redefine the current heading as `radians`
    fn set_position(&mut self, radians: f64) -> Result<(), HardwareError>;
}

// Control

/// A feedback loop converting (measurement, setpoint) into an actuator command
pub trait FeedbackController {
    /// Compute the next output for one control period
    fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64;

    /// Treat inputs as circular over `[min, max]`
    fn enable_continuous_input(&mut self, min: f64, max: f64);

    /// Whether continuous input is enabled
    fn is_continuous_input_enabled(&self) -> bool;

    /// Whether the last error was within tolerance
    fn at_setpoint(&self) -> bool;

    /// Clear accumulated integral and derivative state
    fn reset(&mut self);
}

// Binding

/// Source of device handles bound to hardware identifiers.
///
/// Implementations decide what identifiers are valid and refuse to bind one
/// twice.
pub trait ModuleHardwareProvider {
    fn drive_motor(
        &mut self,
        channel: u32,
        encoder_port: u32,
    ) -> Result<Box<dyn DriveMotor>, HardwareError>;

    fn turning_motor(&mut self, channel: u32) -> Result<Box<dyn SpeedActuator>, HardwareError>;

    fn angle_sensor(&mut self, port: u32) -> Result<Box<dyn AngleSensor>, HardwareError>;
}
