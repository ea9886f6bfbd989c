use std::collections::HashSet;
use swerve_core::{ChannelKind, HardwareError};

/// Motor channels available on the simulated controller bus
pub const DEFAULT_MOTOR_CHANNELS: u32 = 64;
/// Sensor ports available on the simulated IO board
pub const DEFAULT_SENSOR_PORTS: u32 = 32;

/// Tracks which hardware identifiers have been handed out
#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    motor_limit: u32,
    sensor_limit: u32,
    motors: HashSet<u32>,
    sensors: HashSet<u32>,
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MOTOR_CHANNELS, DEFAULT_SENSOR_PORTS)
    }
}

impl ChannelRegistry {
    pub fn new(motor_limit: u32, sensor_limit: u32) -> Self {
        Self {
            motor_limit,
            sensor_limit,
            motors: HashSet::new(),
            sensors: HashSet::new(),
        }
    }

    fn limit(&self, kind: ChannelKind) -> u32 {
        match kind {
            ChannelKind::Motor => self.motor_limit,
            ChannelKind::Sensor => self.sensor_limit,
        }
    }

    fn bound(&self, kind: ChannelKind) -> &HashSet<u32> {
        match kind {
            ChannelKind::Motor => &self.motors,
            ChannelKind::Sensor => &self.sensors,
        }
    }

    /// Fail if `id` is out of range or already claimed
    pub fn check(&self, kind: ChannelKind, id: u32) -> Result<(), HardwareError> {
        if id >= self.limit(kind) {
            return Err(HardwareError::InvalidChannel { kind, id });
        }
        if self.bound(kind).contains(&id) {
            return Err(HardwareError::ChannelInUse { kind, id });
        }
        Ok(())
    }

    /// Claim `id`, failing like [`check`](Self::check)
    pub fn claim(&mut self, kind: ChannelKind, id: u32) -> Result<(), HardwareError> {
        self.check(kind, id)?;
        match kind {
            ChannelKind::Motor => self.motors.insert(id),
            ChannelKind::Sensor => self.sensors.insert(id),
        };
        Ok(())
    }

    pub fn is_bound(&self, kind: ChannelKind, id: u32) -> bool {
        self.bound(kind).contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut registry = ChannelRegistry::default();
        assert!(registry.claim(ChannelKind::Motor, 3).is_ok());
        assert!(registry.is_bound(ChannelKind::Motor, 3));
        assert_eq!(
            registry.claim(ChannelKind::Motor, 3),
            Err(HardwareError::ChannelInUse { kind: ChannelKind::Motor, id: 3 })
        );
    }

    #[test]
    fn test_kinds_are_separate() {
        let mut registry = ChannelRegistry::default();
        registry.claim(ChannelKind::Motor, 1).unwrap();
        assert!(registry.claim(ChannelKind::Sensor, 1).is_ok());
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        let mut registry = ChannelRegistry::new(4, 2);
        assert_eq!(
            registry.claim(ChannelKind::Motor, 4),
            Err(HardwareError::InvalidChannel { kind: ChannelKind::Motor, id: 4 })
        );
        assert_eq!(
            registry.claim(ChannelKind::Sensor, 2),
            Err(HardwareError::InvalidChannel { kind: ChannelKind::Sensor, id: 2 })
        );
    }
}
