//! Simulated swerve module mechanics
//!
//! A deliberately small model: both axes respond to their normalized motor
//! output as a first-order lag toward a speed proportional to that output.
//! Velocities are updated first, then integrated into position with the new
//! velocity (semi-implicit Euler).

use serde::{Deserialize, Serialize};
use swerve_core::{wrap_angle, ModuleConstants, ModulePosition, ModuleState, Rotation2d};

use crate::model::{Model, PlantModel, SimContext};

/// Physical response of a simulated module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Wheel surface speed at full drive output (m/s)
    pub max_drive_speed: f64,
    /// Drive speed lag (s)
    pub drive_time_constant: f64,
    /// Steering rate at full turning output (rad/s)
    pub max_steer_rate: f64,
    /// Steering rate lag (s)
    pub steer_time_constant: f64,
    /// Drive encoder counts down when the wheel rolls forward
    pub drive_encoder_inverted: bool,
    /// Turning sensor reads clockwise-positive
    pub turning_encoder_inverted: bool,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            max_drive_speed: 4.5,
            drive_time_constant: 0.1,
            max_steer_rate: 10.0,
            steer_time_constant: 0.05,
            drive_encoder_inverted: false,
            turning_encoder_inverted: false,
        }
    }
}

/// First-order approach factor for one step, never overshooting the target
fn lag_factor(dt: f64, time_constant: f64) -> f64 {
    if time_constant <= 0.0 { 1.0 } else { (dt / time_constant).min(1.0) }
}

/// True mechanical state of one module plus its sensor registers
#[derive(Debug, Clone)]
pub struct ModulePlant {
    config: PlantConfig,
    constants: ModuleConstants,
    drive_output: f64,
    turning_output: f64,
    wheel_speed: f64,
    wheel_distance: f64,
    steer_rate: f64,
    heading: f64,
    drive_count_offset: f64,
    heading_offset: f64,
    drive_connected: bool,
    sensor_connected: bool,
}

impl ModulePlant {
    pub fn new(config: PlantConfig, constants: ModuleConstants) -> Self {
        Self {
            config,
            constants,
            drive_output: 0.0,
            turning_output: 0.0,
            wheel_speed: 0.0,
            wheel_distance: 0.0,
            steer_rate: 0.0,
            heading: 0.0,
            drive_count_offset: 0.0,
            heading_offset: 0.0,
            drive_connected: true,
            sensor_connected: true,
        }
    }

    /// Start the module at a given physical heading
    pub fn with_heading(mut self, heading: Rotation2d) -> Self {
        self.heading = heading.radians();
        self
    }

    // --- Actuation ---

    pub fn set_drive_output(&mut self, output: f64) {
        self.drive_output = output.clamp(-1.0, 1.0);
    }

    pub fn set_turning_output(&mut self, output: f64) {
        self.turning_output = output.clamp(-1.0, 1.0);
    }

    pub fn drive_output(&self) -> f64 {
        self.drive_output
    }

    pub fn turning_output(&self) -> f64 {
        self.turning_output
    }

    // --- Sensor registers ---

    fn drive_sign(&self) -> f64 {
        if self.config.drive_encoder_inverted { -1.0 } else { 1.0 }
    }

    fn turning_sign(&self) -> f64 {
        if self.config.turning_encoder_inverted { -1.0 } else { 1.0 }
    }

    /// Drive encoder rate (counts/s)
    pub fn encoder_rate(&self) -> f64 {
        self.drive_sign() * self.constants.distance_to_counts(self.wheel_speed)
    }

    /// Drive encoder position (counts)
    pub fn encoder_counts(&self) -> f64 {
        self.drive_sign() * self.constants.distance_to_counts(self.wheel_distance) - self.drive_count_offset
    }

    pub fn set_encoder_counts(&mut self, counts: f64) {
        self.drive_count_offset = self.encoder_counts() + self.drive_count_offset - counts;
    }

    /// Turning sensor reading (rad)
    pub fn heading_reading(&self) -> Rotation2d {
        Rotation2d::from_radians(self.turning_sign() * self.heading - self.heading_offset)
    }

    pub fn set_heading_reading(&mut self, radians: f64) {
        self.heading_offset = wrap_angle(self.turning_sign() * self.heading - radians);
    }

    // --- Fault injection ---

    pub fn set_drive_connected(&mut self, connected: bool) {
        self.drive_connected = connected;
    }

    pub fn set_sensor_connected(&mut self, connected: bool) {
        self.sensor_connected = connected;
    }

    pub fn drive_connected(&self) -> bool {
        self.drive_connected
    }

    pub fn sensor_connected(&self) -> bool {
        self.sensor_connected
    }

    // --- Ground truth ---

    /// Physical wheel speed and heading
    pub fn true_state(&self) -> ModuleState {
        ModuleState::new(self.wheel_speed, Rotation2d::from_radians(self.heading))
    }

    /// Physical wheel travel and heading
    pub fn true_position(&self) -> ModulePosition {
        ModulePosition::new(self.wheel_distance, Rotation2d::from_radians(self.heading))
    }
}

impl Model for ModulePlant {
    fn reset(&mut self) {
        self.drive_output = 0.0;
        self.turning_output = 0.0;
        self.wheel_speed = 0.0;
        self.wheel_distance = 0.0;
        self.steer_rate = 0.0;
        self.heading = 0.0;
        self.drive_count_offset = 0.0;
        self.heading_offset = 0.0;
    }
}

impl PlantModel for ModulePlant {
    fn step(&mut self, ctx: SimContext) {
        let dt = ctx.dt;

        let target_speed = self.drive_output * self.config.max_drive_speed;
        self.wheel_speed += (target_speed - self.wheel_speed)
            * lag_factor(dt, self.config.drive_time_constant);

        let target_rate = self.turning_output * self.config.max_steer_rate;
        self.steer_rate += (target_rate - self.steer_rate)
            * lag_factor(dt, self.config.steer_time_constant);

        self.wheel_distance += self.wheel_speed * dt;
        self.heading = wrap_angle(self.heading + self.steer_rate * dt);
    }
}
