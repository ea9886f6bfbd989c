//! Swerve Module Controller
//!
//! Drives one wheel module toward a commanded [`ModuleState`]: the drive motor
//! runs a velocity loop, the turning motor runs a circular angle loop, and the
//! target is first optimized so the module never steers more than a quarter
//! turn.

use log::{debug, info, trace};
use std::f64::consts::PI;
use swerve_core::{
    AngleSensor, DriveMotor, FeedbackController, HardwareError, ModuleConstants,
    ModuleHardwareProvider, ModulePosition, ModuleState, Rotation2d, SpeedActuator,
};

use crate::config::{ModuleConfig, ModuleSettings};
use crate::pidf::PidfController;

/// Device handles and loop controllers a module is assembled from
pub struct ModuleParts {
    pub drive_motor: Box<dyn DriveMotor>,
    pub turning_motor: Box<dyn SpeedActuator>,
    pub turning_encoder: Box<dyn AngleSensor>,
    pub drive_controller: Box<dyn FeedbackController>,
    pub turning_controller: Box<dyn FeedbackController>,
}

/// Controller for one swerve module
pub struct SwerveModule {
    drive_motor: Box<dyn DriveMotor>,
    turning_motor: Box<dyn SpeedActuator>,
    turning_encoder: Box<dyn AngleSensor>,
    drive_controller: Box<dyn FeedbackController>,
    turning_controller: Box<dyn FeedbackController>,
    constants: ModuleConstants,
    drive_encoder_reversed: bool,
    turning_encoder_reversed: bool,
}

impl SwerveModule {
    /// Bind the module's devices through `hardware` and build PIDF loops from `settings`
    pub fn new(
        config: &ModuleConfig,
        settings: &ModuleSettings,
        hardware: &mut dyn ModuleHardwareProvider,
    ) -> Result<Self, HardwareError> {
        let parts = ModuleParts {
            drive_motor: hardware.drive_motor(config.drive_motor_channel, config.drive_encoder_port)?,
            turning_motor: hardware.turning_motor(config.turning_motor_channel)?,
            turning_encoder: hardware.angle_sensor(config.turning_encoder_port)?,
            drive_controller: Box::new(PidfController::new(settings.drive_controller.clone())),
            turning_controller: Box::new(PidfController::new(settings.turning_controller.clone())),
        };
        info!(
            "swerve module bound: drive motor {} turning motor {} drive encoder {} turning encoder {}",
            config.drive_motor_channel,
            config.turning_motor_channel,
            config.drive_encoder_port,
            config.turning_encoder_port
        );
        Ok(Self::from_parts(
            parts,
            settings.constants,
            config.drive_encoder_reversed,
            config.turning_encoder_reversed,
        ))
    }

    /// Assemble a module from explicit handles owned by the caller
    pub fn from_parts(
        parts: ModuleParts,
        constants: ModuleConstants,
        drive_encoder_reversed: bool,
        turning_encoder_reversed: bool,
    ) -> Self {
        let ModuleParts {
            drive_motor,
            turning_motor,
            turning_encoder,
            drive_controller,
            mut turning_controller,
        } = parts;

        turning_controller.enable_continuous_input(-PI, PI);

        Self {
            drive_motor,
            turning_motor,
            turning_encoder,
            drive_controller,
            turning_controller,
            constants,
            drive_encoder_reversed,
            turning_encoder_reversed,
        }
    }

    fn drive_sign(&self) -> f64 {
        if self.drive_encoder_reversed { -1.0 } else { 1.0 }
    }

    /// Wheel surface speed (m/s)
    fn drive_velocity(&self) -> Result<f64, HardwareError> {
        let rate = self.drive_motor.rate()? * self.drive_sign();
        Ok(self.constants.counts_to_distance(rate))
    }

    /// Wheel travel (m)
    fn drive_distance(&self) -> Result<f64, HardwareError> {
        let counts = self.drive_motor.position()? * self.drive_sign();
        Ok(self.constants.counts_to_distance(counts))
    }

    fn turning_angle(&self) -> Result<Rotation2d, HardwareError> {
        let angle = self.turning_encoder.angle()?;
        Ok(if self.turning_encoder_reversed { -angle } else { angle })
    }

    /// Measured speed and heading
    pub fn get_state(&self) -> Result<ModuleState, HardwareError> {
        Ok(ModuleState::new(self.drive_velocity()?, self.turning_angle()?))
    }

    /// Measured distance and heading, for odometry
    pub fn get_position(&self) -> Result<ModulePosition, HardwareError> {
        Ok(ModulePosition::new(self.drive_distance()?, self.turning_angle()?))
    }

    /// Run both loops once toward `desired` and apply the outputs
    pub fn set_desired_state(&mut self, desired: ModuleState) -> Result<(), HardwareError> {
        let current_angle = self.turning_angle()?;
        let state = desired.optimize(current_angle);
        if state.angle != desired.angle {
            debug!(
                "target {:.1} deg reversed to {:.1} deg at {:.1} deg",
                desired.angle.degrees(),
                state.angle.degrees(),
                current_angle.degrees()
            );
        }

        let drive_output = self
            .drive_controller
            .calculate(self.drive_velocity()?, state.speed)
            .clamp(-1.0, 1.0);
        let turn_output = self
            .turning_controller
            .calculate(current_angle.radians(), state.angle.radians())
            .clamp(-1.0, 1.0);

        trace!("drive output {:.3} turning output {:.3}", drive_output, turn_output);
        self.drive_motor.set(drive_output)?;
        self.turning_motor.set(turn_output)?;
        Ok(())
    }

    /// Zero the drive encoder count and the turning sensor reading.
    ///
    /// Both loops are reset too, so the jump in the readings is not seen as motion.
    pub fn reset_encoders(&mut self) -> Result<(), HardwareError> {
        self.drive_motor.set_position(0.0)?;
        self.turning_encoder.set_position(0.0)?;
        self.drive_controller.reset();
        self.turning_controller.reset();
        info!("swerve module encoders reset");
        Ok(())
    }

    /// Whether the last turning command left the heading within tolerance
    pub fn at_target_angle(&self) -> bool {
        self.turning_controller.at_setpoint()
    }

    /// Command zero output on both motors
    pub fn stop(&mut self) -> Result<(), HardwareError> {
        self.drive_motor.set(0.0)?;
        self.turning_motor.set(0.0)
    }

    /// Convert drive encoder counts to wheel travel (m)
    pub fn convert_sensor_counts_to_distance(&self, counts: f64) -> f64 {
        self.constants.counts_to_distance(counts)
    }

    pub fn constants(&self) -> &ModuleConstants {
        &self.constants
    }
}
