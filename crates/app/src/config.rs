//! Drivetrain configuration file
//!
//! JSON, with every section optional; missing sections fall back to a square
//! four-module robot.

use control::{check_unique_ids, ConfigError, ModuleConfig, ModuleSettings, PidfConfig};
use serde::{Deserialize, Serialize};
use sim_hardware::PlantConfig;
use std::path::{Path, PathBuf};
use swerve_core::ModuleConstants;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Module(#[from] ConfigError),

    #[error("loop period must be positive, got {0}")]
    Period(f64),

    #[error("no modules configured")]
    NoModules,
}

/// One module and the name it is logged under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedModule {
    pub name: String,
    #[serde(flatten)]
    pub config: ModuleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Control loop period (s)
    pub period: f64,
    pub settings: ModuleSettings,
    pub plant: PlantConfig,
    pub modules: Vec<NamedModule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let plant = PlantConfig::default();
        let named = |name: &str, base: u32| NamedModule {
            name: name.to_string(),
            config: ModuleConfig::new(2 * base + 1, 2 * base + 2, 2 * base, 2 * base + 1),
        };
        Self {
            period: 0.02,
            settings: ModuleSettings {
                constants: ModuleConstants::default(),
                drive_controller: PidfConfig::pidf(1.0, 0.0, 0.0, 1.0 / plant.max_drive_speed)
                    .with_limits(-1.0, 1.0),
                turning_controller: PidfConfig::p(1.0).with_limits(-1.0, 1.0),
            },
            plant,
            modules: vec![
                named("front_left", 0),
                named("front_right", 1),
                named("back_left", 2),
                named("back_right", 3),
            ],
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppConfigError> {
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(AppConfigError::Period(self.period));
        }
        if self.modules.is_empty() {
            return Err(AppConfigError::NoModules);
        }
        self.module_settings().validate()?;
        check_unique_ids(self.modules.iter().map(|m| &m.config))?;
        Ok(())
    }

    /// Module settings with both loops running at the application period
    pub fn module_settings(&self) -> ModuleSettings {
        let mut settings = self.settings.clone();
        settings.drive_controller.period = self.period;
        settings.turning_controller.period = self.period;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.modules.len(), 4);
        assert_eq!(config.modules[3].config.drive_motor_channel, 7);
        assert_eq!(config.modules[3].config.turning_encoder_port, 7);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flattened_module_entries() {
        let json = r#"{
            "period": 0.01,
            "modules": [
                { "name": "solo", "drive_motor_channel": 10, "turning_motor_channel": 11,
                  "drive_encoder_port": 0, "turning_encoder_port": 1,
                  "drive_encoder_reversed": true }
            ]
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.modules.len(), 1);
        assert_eq!(config.modules[0].name, "solo");
        assert!(config.modules[0].config.drive_encoder_reversed);
        assert_eq!(config.module_settings().turning_controller.period, 0.01);
    }

    #[test]
    fn test_rejects_bad_period() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "period": 0.0 }"#),
            Err(AppConfigError::Period(_))
        ));
    }

    #[test]
    fn test_rejects_empty_module_list() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "modules": [] }"#),
            Err(AppConfigError::NoModules)
        ));
    }

    #[test]
    fn test_rejects_shared_channels() {
        let json = r#"{
            "modules": [
                { "name": "a", "drive_motor_channel": 1, "turning_motor_channel": 2,
                  "drive_encoder_port": 0, "turning_encoder_port": 1 },
                { "name": "b", "drive_motor_channel": 2, "turning_motor_channel": 3,
                  "drive_encoder_port": 2, "turning_encoder_port": 3 }
            ]
        }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(AppConfigError::Module(ConfigError::DuplicateId { id: 2, .. }))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(AppConfig::from_json("{ nope"), Err(AppConfigError::Parse(_))));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config = AppConfig::from_json(include_str!("../config/drivetrain.json")).unwrap();
        assert_eq!(config.modules.len(), 4);
        assert!(config.modules[1].config.drive_encoder_reversed);
        assert_eq!(config.settings.turning_controller.tolerance, 0.02);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Path::new("/nonexistent/drivetrain.json")).unwrap_err();
        assert!(matches!(err, AppConfigError::Io { .. }));
    }
}
