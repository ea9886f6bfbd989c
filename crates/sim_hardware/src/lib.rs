//! Simulated hardware for swerve modules
//!
//! This crate provides:
//! - A channel/port registry that refuses invalid or double bindings
//! - A first-order module plant with encoder registers and fault injection
//! - Device handles implementing the `swerve_core` capability traits
//! - [`SimHardware`], a [`ModuleHardwareProvider`] over a set of plants

pub mod devices;
pub mod model;
pub mod plant;
pub mod registry;

pub use devices::*;
pub use model::*;
pub use plant::*;
pub use registry::*;

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use swerve_core::{
    AngleSensor, ChannelKind, DriveMotor, HardwareError, ModuleHardwareProvider, SpeedActuator,
};

/// Hardware identifiers a simulated plant is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleWiring {
    pub drive_motor_channel: u32,
    pub turning_motor_channel: u32,
    pub drive_encoder_port: u32,
    pub turning_encoder_port: u32,
}

struct WiredPlant {
    wiring: ModuleWiring,
    plant: SharedPlant,
}

/// A simulated robot: plants wired to channels, plus the binding registry
#[derive(Default)]
pub struct SimHardware {
    registry: ChannelRegistry,
    modules: Vec<WiredPlant>,
    time: f64,
}

impl SimHardware {
    pub fn new(registry: ChannelRegistry) -> Self {
        Self { registry, modules: Vec::new(), time: 0.0 }
    }

    /// Wire a plant to its identifiers and return a handle for inspection
    pub fn add_module(&mut self, wiring: ModuleWiring, plant: ModulePlant) -> SharedPlant {
        let plant = Rc::new(RefCell::new(plant));
        self.modules.push(WiredPlant { wiring, plant: plant.clone() });
        plant
    }

    fn find(&self, matches: impl Fn(&ModuleWiring) -> bool) -> Option<&WiredPlant> {
        self.modules.iter().find(|m| matches(&m.wiring))
    }

    /// Advance every plant by `dt`
    pub fn step(&mut self, dt: f64) {
        let ctx = SimContext { dt };
        for module in &self.modules {
            module.plant.borrow_mut().step(ctx);
        }
        self.time += dt;
    }

    /// Simulated time (s)
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }
}

impl Model for SimHardware {
    fn reset(&mut self) {
        for module in &self.modules {
            module.plant.borrow_mut().reset();
        }
        self.time = 0.0;
    }
}

impl ModuleHardwareProvider for SimHardware {
    fn drive_motor(
        &mut self,
        channel: u32,
        encoder_port: u32,
    ) -> Result<Box<dyn DriveMotor>, HardwareError> {
        self.registry.check(ChannelKind::Motor, channel)?;
        self.registry.check(ChannelKind::Sensor, encoder_port)?;
        let wired = self
            .find(|w| w.drive_motor_channel == channel)
            .ok_or(HardwareError::InvalidChannel { kind: ChannelKind::Motor, id: channel })?;
        if wired.wiring.drive_encoder_port != encoder_port {
            return Err(HardwareError::InvalidChannel { kind: ChannelKind::Sensor, id: encoder_port });
        }
        let plant = wired.plant.clone();

        self.registry.claim(ChannelKind::Motor, channel)?;
        self.registry.claim(ChannelKind::Sensor, encoder_port)?;
        debug!("bound simulated drive motor {} with encoder {}", channel, encoder_port);
        Ok(Box::new(SimDriveMotor::new(plant, channel)))
    }

    fn turning_motor(&mut self, channel: u32) -> Result<Box<dyn SpeedActuator>, HardwareError> {
        self.registry.check(ChannelKind::Motor, channel)?;
        let plant = self
            .find(|w| w.turning_motor_channel == channel)
            .map(|m| m.plant.clone())
            .ok_or(HardwareError::InvalidChannel { kind: ChannelKind::Motor, id: channel })?;

        self.registry.claim(ChannelKind::Motor, channel)?;
        debug!("bound simulated turning motor {}", channel);
        Ok(Box::new(SimTurningMotor::new(plant)))
    }

    fn angle_sensor(&mut self, port: u32) -> Result<Box<dyn AngleSensor>, HardwareError> {
        self.registry.check(ChannelKind::Sensor, port)?;
        let plant = self
            .find(|w| w.turning_encoder_port == port)
            .map(|m| m.plant.clone())
            .ok_or(HardwareError::InvalidChannel { kind: ChannelKind::Sensor, id: port })?;

        self.registry.claim(ChannelKind::Sensor, port)?;
        debug!("bound simulated turning encoder {}", port);
        Ok(Box::new(SimAngleSensor::new(plant, port)))
    }
}
