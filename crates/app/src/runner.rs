//! Fixed-period control loop over simulated modules

use control::SwerveModule;
use log::{info, warn};
use sim_hardware::{ModulePlant, ModuleWiring, SharedPlant, SimHardware};
use swerve_core::{HardwareError, ModulePosition, ModuleState, Rotation2d};

use crate::config::AppConfig;

/// Seconds between state log lines
const REPORT_INTERVAL: f64 = 0.5;

/// Target for every module at time `t`: forward, diagonal, straight back
/// along the diagonal, then hold
pub fn scripted_target(t: f64) -> ModuleState {
    if t < 1.0 {
        ModuleState::new(1.0, Rotation2d::ZERO)
    } else if t < 2.0 {
        ModuleState::new(1.0, Rotation2d::from_degrees(45.0))
    } else if t < 3.0 {
        ModuleState::new(1.0, Rotation2d::from_degrees(-135.0))
    } else {
        ModuleState::new(0.0, Rotation2d::from_degrees(-135.0))
    }
}

struct RunningModule {
    name: String,
    module: SwerveModule,
    plant: SharedPlant,
}

/// Final readings of one module; `None` where the hardware could not be read
#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub name: String,
    pub state: Option<ModuleState>,
    pub position: Option<ModulePosition>,
    pub faults: usize,
}

pub struct Runner {
    period: f64,
    hardware: SimHardware,
    modules: Vec<RunningModule>,
    faults: Vec<usize>,
}

impl Runner {
    /// Wire one plant per configured module and bind the module controllers
    pub fn new(config: &AppConfig) -> Result<Self, HardwareError> {
        let settings = config.module_settings();
        let mut hardware = SimHardware::default();
        let mut modules = Vec::with_capacity(config.modules.len());

        for named in &config.modules {
            let c = &named.config;
            let wiring = ModuleWiring {
                drive_motor_channel: c.drive_motor_channel,
                turning_motor_channel: c.turning_motor_channel,
                drive_encoder_port: c.drive_encoder_port,
                turning_encoder_port: c.turning_encoder_port,
            };
            // Mount the simulated sensors the way the config says they are mounted
            let mut plant_config = config.plant.clone();
            plant_config.drive_encoder_inverted = c.drive_encoder_reversed;
            plant_config.turning_encoder_inverted = c.turning_encoder_reversed;

            let plant = hardware.add_module(wiring, ModulePlant::new(plant_config, settings.constants));
            let mut module = SwerveModule::new(c, &settings, &mut hardware)?;
            module.reset_encoders()?;
            modules.push(RunningModule { name: named.name.clone(), module, plant });
        }

        let faults = vec![0; modules.len()];
        Ok(Self { period: config.period, hardware, modules, faults })
    }

    /// Access a module's plant, for fault injection
    #[cfg(test)]
    pub fn plant(&self, name: &str) -> Option<SharedPlant> {
        self.modules.iter().find(|m| m.name == name).map(|m| m.plant.clone())
    }

    /// Run one control period: command every module, then advance the plants
    pub fn tick(&mut self) {
        let target = scripted_target(self.hardware.time());
        for (running, faults) in self.modules.iter_mut().zip(self.faults.iter_mut()) {
            if let Err(err) = running.module.set_desired_state(target) {
                *faults += 1;
                warn!("{}: {}", running.name, err);
                if let Err(err) = running.module.stop() {
                    warn!("{}: failed to stop: {}", running.name, err);
                }
            }
        }
        self.hardware.step(self.period);
    }

    fn log_states(&self) {
        for running in &self.modules {
            match (running.module.get_state(), running.module.get_position()) {
                (Ok(state), Ok(position)) => info!(
                    "t={:.2}s {}: {:+.2} m/s @ {:+.1} deg{}, {:+.3} m",
                    self.hardware.time(),
                    running.name,
                    state.speed,
                    state.angle.degrees(),
                    if running.module.at_target_angle() { "" } else { " (steering)" },
                    position.distance
                ),
                (Err(err), _) | (_, Err(err)) => warn!("{}: {}", running.name, err),
            }
        }
    }

    /// Run `ticks` periods, logging module states every half second
    pub fn run(&mut self, ticks: usize) -> Vec<ModuleReport> {
        let report_every = ((REPORT_INTERVAL / self.period).round() as usize).max(1);
        for tick in 0..ticks {
            self.tick();
            if (tick + 1) % report_every == 0 {
                self.log_states();
            }
        }
        for running in &mut self.modules {
            if let Err(err) = running.module.stop() {
                warn!("{}: failed to stop: {}", running.name, err);
            }
        }
        self.report()
    }

    /// Current readings of every module
    pub fn report(&self) -> Vec<ModuleReport> {
        self.modules
            .iter()
            .zip(&self.faults)
            .map(|(running, &faults)| ModuleReport {
                name: running.name.clone(),
                state: read(&running.name, running.module.get_state()),
                position: read(&running.name, running.module.get_position()),
                faults,
            })
            .collect()
    }
}

fn read<T>(name: &str, reading: Result<T, HardwareError>) -> Option<T> {
    reading.map_err(|err| warn!("{}: {}", name, err)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamedModule;
    use control::ModuleConfig;

    #[test]
    fn test_script_phases() {
        assert_eq!(scripted_target(0.5).angle, Rotation2d::ZERO);
        assert_eq!(scripted_target(1.5).angle, Rotation2d::from_degrees(45.0));
        assert_eq!(scripted_target(2.5).speed, 1.0);
        assert_eq!(scripted_target(10.0).speed, 0.0);
    }

    #[test]
    fn test_run_tracks_script() {
        let mut runner = Runner::new(&AppConfig::default()).unwrap();
        // Through forward, diagonal and into the backward phase
        let reports = runner.run(140);

        assert_eq!(reports.len(), 4);
        for report in reports {
            assert_eq!(report.faults, 0);
            let state = report.state.unwrap();
            // Still facing the diagonal and rolling backwards instead of spinning around
            assert!((state.angle.degrees() - 45.0).abs() < 2.0, "{:?}", state);
            assert!(state.speed < -0.9, "{:?}", state);
            assert!(report.position.unwrap().distance > 0.5, "{:?}", report);
        }
    }

    #[test]
    fn test_reversed_modules_still_track() {
        let mut config = AppConfig::default();
        config.modules = vec![NamedModule {
            name: "flipped".into(),
            config: ModuleConfig::new(1, 2, 0, 1).with_reversed(true, true),
        }];
        let mut runner = Runner::new(&config).unwrap();
        let reports = runner.run(40);
        assert!(reports[0].state.unwrap().angle.degrees().abs() < 2.0);
        assert!(reports[0].position.unwrap().distance > 0.3);
    }

    #[test]
    fn test_disconnected_sensor_counts_faults() {
        let mut runner = Runner::new(&AppConfig::default()).unwrap();
        runner.run(5);
        runner.plant("back_left").unwrap().borrow_mut().set_sensor_connected(false);
        let reports = runner.run(10);

        let back_left = reports.iter().find(|r| r.name == "back_left").unwrap();
        assert_eq!(back_left.faults, 10);
        assert!(back_left.state.is_none());
        assert!(back_left.position.is_none());
        assert!(reports.iter().filter(|r| r.name != "back_left").all(|r| r.faults == 0 && r.state.is_some()));
    }
}
