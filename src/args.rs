//! Command line argument parsing for the fan regulator

use crate::actuator::ActuatorKind;
use crate::errors::Result;
use crate::policy::ThresholdModifier;
use crate::settings::Settings;
use clap::Parser;
use std::path::PathBuf;

/// ThinkPad fan regulator
///
/// Polls ACPI thermal zones and steps the fan level. SIGHUP or SIGUSR1 re-reads the
/// modifier from the config file; SIGINT, SIGTERM or SIGTSTP restore automatic control and exit.
#[derive(Parser, Debug)]
#[command(name = "fanreg")]
#[command(about = "ThinkPad fan regulator daemon")]
#[command(version)]
pub struct Args {
    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Thermal zone file
    #[arg(long, value_name = "PATH")]
    pub thermal: Option<PathBuf>,

    /// Fan control file
    #[arg(long, value_name = "PATH")]
    pub fan: Option<PathBuf>,

    /// Modifier config file, read on reload
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where to record the process id
    #[arg(long, value_name = "PATH")]
    pub pid_file: Option<PathBuf>,

    /// Seconds between evaluations
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// How fan directives are written
    #[arg(long, value_enum)]
    pub actuator: Option<ActuatorKind>,

    /// Modifier used until the first reload
    #[arg(long, value_parser = parse_modifier)]
    pub modifier: Option<ThresholdModifier>,
}

fn parse_modifier(token: &str) -> std::result::Result<ThresholdModifier, String> {
    token.parse().map_err(|e: crate::errors::FanRegError| e.to_string())
}

impl Args {
    /// Resolve the effective settings: file (or defaults), then command line overrides
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load_from_file(path)?,
            None => Settings::default(),
        };

        if let Some(path) = &self.thermal {
            settings.thermal_path = path.clone();
        }
        if let Some(path) = &self.fan {
            settings.fan_path = path.clone();
        }
        if let Some(path) = &self.config {
            settings.config_path = path.clone();
        }
        if let Some(path) = &self.pid_file {
            settings.pid_file = path.clone();
        }
        if let Some(secs) = self.interval {
            settings.interval_secs = secs;
        }
        if let Some(kind) = self.actuator {
            settings.actuator = kind;
        }
        if let Some(modifier) = self.modifier {
            settings.modifier = modifier;
        }

        settings.validate()?;
        Ok(settings)
    }
}
