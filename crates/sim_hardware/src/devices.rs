//! Device handles backed by a shared [`ModulePlant`]
//!
//! All three handles of one module point at the same plant, the way the real
//! motor controller and sensor see the same physical module.

use std::cell::RefCell;
use std::rc::Rc;
use swerve_core::{
    AngleSensor, ChannelKind, DriveMotor, HardwareError, Rotation2d, SpeedActuator,
};

use crate::plant::ModulePlant;

pub type SharedPlant = Rc<RefCell<ModulePlant>>;

/// Drive motor with its integrated encoder
pub struct SimDriveMotor {
    plant: SharedPlant,
    channel: u32,
}

impl SimDriveMotor {
    pub fn new(plant: SharedPlant, channel: u32) -> Self {
        Self { plant, channel }
    }

    fn connected(&self) -> Result<(), HardwareError> {
        if self.plant.borrow().drive_connected() {
            Ok(())
        } else {
            Err(HardwareError::Disconnected { kind: ChannelKind::Motor, id: self.channel })
        }
    }
}

impl SpeedActuator for SimDriveMotor {
    fn set(&mut self, output: f64) -> Result<(), HardwareError> {
        self.connected()?;
        self.plant.borrow_mut().set_drive_output(output);
        Ok(())
    }

    fn get(&self) -> f64 {
        self.plant.borrow().drive_output()
    }
}

impl DriveMotor for SimDriveMotor {
    fn rate(&self) -> Result<f64, HardwareError> {
        self.connected()?;
        Ok(self.plant.borrow().encoder_rate())
    }

    fn position(&self) -> Result<f64, HardwareError> {
        self.connected()?;
        Ok(self.plant.borrow().encoder_counts())
    }

    fn set_position(&mut self, counts: f64) -> Result<(), HardwareError> {
        self.connected()?;
        self.plant.borrow_mut().set_encoder_counts(counts);
        Ok(())
    }
}

/// Steering motor
pub struct SimTurningMotor {
    plant: SharedPlant,
}

impl SimTurningMotor {
    pub fn new(plant: SharedPlant) -> Self {
        Self { plant }
    }
}

impl SpeedActuator for SimTurningMotor {
    fn set(&mut self, output: f64) -> Result<(), HardwareError> {
        self.plant.borrow_mut().set_turning_output(output);
        Ok(())
    }

    fn get(&self) -> f64 {
        self.plant.borrow().turning_output()
    }
}

/// Turning position sensor
pub struct SimAngleSensor {
    plant: SharedPlant,
    port: u32,
}

impl SimAngleSensor {
    pub fn new(plant: SharedPlant, port: u32) -> Self {
        Self { plant, port }
    }

    fn connected(&self) -> Result<(), HardwareError> {
        if self.plant.borrow().sensor_connected() {
            Ok(())
        } else {
            Err(HardwareError::Disconnected { kind: ChannelKind::Sensor, id: self.port })
        }
    }
}

impl AngleSensor for SimAngleSensor {
    fn angle(&self) -> Result<Rotation2d, HardwareError> {
        self.connected()?;
        Ok(self.plant.borrow().heading_reading())
    }

    fn set_position(&mut self, radians: f64) -> Result<(), HardwareError> {
        self.connected()?;
        self.plant.borrow_mut().set_heading_reading(radians);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::PlantConfig;
    use swerve_core::ModuleConstants;

    fn shared() -> SharedPlant {
        Rc::new(RefCell::new(ModulePlant::new(PlantConfig::default(), ModuleConstants::default())))
    }

    #[test]
    fn test_handles_share_plant() {
        let plant = shared();
        let mut drive = SimDriveMotor::new(plant.clone(), 1);
        let mut turning = SimTurningMotor::new(plant.clone());

        drive.set(0.4).unwrap();
        turning.set(-0.2).unwrap();
        assert_eq!(plant.borrow().drive_output(), 0.4);
        assert_eq!(drive.get(), 0.4);
        assert_eq!(turning.get(), -0.2);
    }

    #[test]
    fn test_disconnected_drive_reports_channel() {
        let plant = shared();
        let mut drive = SimDriveMotor::new(plant.clone(), 9);
        plant.borrow_mut().set_drive_connected(false);

        assert_eq!(
            drive.rate(),
            Err(HardwareError::Disconnected { kind: ChannelKind::Motor, id: 9 })
        );
        assert!(drive.set(1.0).is_err());
        assert_eq!(plant.borrow().drive_output(), 0.0);
    }

    #[test]
    fn test_disconnected_sensor_reports_port() {
        let plant = shared();
        let sensor = SimAngleSensor::new(plant.clone(), 4);
        plant.borrow_mut().set_sensor_connected(false);
        assert_eq!(
            sensor.angle(),
            Err(HardwareError::Disconnected { kind: ChannelKind::Sensor, id: 4 })
        );
    }
}
