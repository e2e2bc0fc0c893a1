//! Daemon settings: file locations, cadence and actuation mode

use crate::actuator::ActuatorKind;
use crate::errors::{FanRegError, Result};
use crate::policy::ThresholdModifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_THERMAL_PATH: &str = "/proc/acpi/ibm/thermal";
pub const DEFAULT_FAN_PATH: &str = "/proc/acpi/ibm/fan";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fanreg.conf";
pub const DEFAULT_PID_FILE: &str = "/run/fanreg.pid";
pub const DEFAULT_INTERVAL_SECS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thermal_path: PathBuf,
    pub fan_path: PathBuf,
    pub config_path: PathBuf,
    pub pid_file: PathBuf,
    pub interval_secs: u64,
    pub actuator: ActuatorKind,
    /// Modifier in effect until the first successful reload
    pub modifier: ThresholdModifier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thermal_path: PathBuf::from(DEFAULT_THERMAL_PATH),
            fan_path: PathBuf::from(DEFAULT_FAN_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            pid_file: PathBuf::from(DEFAULT_PID_FILE),
            interval_secs: DEFAULT_INTERVAL_SECS,
            actuator: ActuatorKind::default(),
            modifier: ThresholdModifier::default(),
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(FanRegError::Settings(
                "interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_thinkpad_acpi() {
        let settings = Settings::default();
        assert_eq!(settings.thermal_path, PathBuf::from("/proc/acpi/ibm/thermal"));
        assert_eq!(settings.fan_path, PathBuf::from("/proc/acpi/ibm/fan"));
        assert_eq!(settings.interval(), Duration::from_secs(20));
        assert_eq!(settings.modifier, ThresholdModifier::Ext);
        assert_eq!(settings.actuator, ActuatorKind::Direct);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"interval_secs": 5, "actuator": "sudo-tee", "modifier": "max"}}"#).unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.interval_secs, 5);
        assert_eq!(settings.actuator, ActuatorKind::SudoTee);
        assert_eq!(settings.modifier, ThresholdModifier::Max);
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"interval_secs": 0}}"#).unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()),
            Err(FanRegError::Settings(_))
        ));
    }

    #[test]
    fn test_unknown_modifier_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"modifier": "lo"}}"#).unwrap();
        assert!(matches!(
            Settings::load_from_file(file.path()),
            Err(FanRegError::Serialization(_))
        ));
    }
}
