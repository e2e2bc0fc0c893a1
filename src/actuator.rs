//! Fan actuation through the ThinkPad ACPI fan control file

use crate::errors::{FanRegError, Result};
use crate::policy::FanLevel;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Accepts a fan level and pushes it to the hardware
pub trait FanActuator {
    fn apply(&mut self, level: FanLevel) -> Result<()>;
}

/// How directives reach the fan control file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ActuatorKind {
    /// Write the file directly; requires the daemon to run as root
    #[default]
    Direct,
    /// Pipe the directive through `sudo tee`
    SudoTee,
}

/// Build the actuator selected in the settings
pub fn from_kind(kind: ActuatorKind, fan_path: &Path) -> Box<dyn FanActuator> {
    match kind {
        ActuatorKind::Direct => Box::new(DirectWrite::new(fan_path)),
        ActuatorKind::SudoTee => Box::new(PrivilegedTee::new(fan_path)),
    }
}

impl<A: FanActuator + ?Sized> FanActuator for Box<A> {
    fn apply(&mut self, level: FanLevel) -> Result<()> {
        (**self).apply(level)
    }
}

/// Writes directives straight into the control file
#[derive(Debug, Clone)]
pub struct DirectWrite {
    path: PathBuf,
}

impl DirectWrite {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FanActuator for DirectWrite {
    fn apply(&mut self, level: FanLevel) -> Result<()> {
        let directive = level.directive();

        // procfs handlers act on each write(2), so no truncate/create here
        OpenOptions::new()
            .write(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(directive.as_bytes()))
            .map_err(|e| FanRegError::Actuator {
                directive: directive.clone(),
                reason: format!("{}: {}", self.path.display(), e),
            })?;

        debug!("Wrote '{}' to {}", directive, self.path.display());
        Ok(())
    }
}

/// Hands directives to a privileged helper, `sudo tee <path>` by default
#[derive(Debug, Clone)]
pub struct PrivilegedTee {
    program: String,
    args: Vec<String>,
    path: PathBuf,
}

impl PrivilegedTee {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_command("sudo", vec!["tee".to_string()], path)
    }

    /// Use a different helper; the target path is appended to `args`
    pub fn with_command(program: impl Into<String>, args: Vec<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            path: path.into(),
        }
    }

    fn failure(directive: &str, reason: impl Into<String>) -> FanRegError {
        FanRegError::Actuator {
            directive: directive.to_string(),
            reason: reason.into(),
        }
    }
}

impl FanActuator for PrivilegedTee {
    fn apply(&mut self, level: FanLevel) -> Result<()> {
        let directive = level.directive();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| Self::failure(&directive, format!("failed to spawn {}: {}", self.program, e)))?;

        // stdin is closed at the end of this match so the helper sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => writeln!(stdin, "{}", directive),
            None => Ok(()),
        };

        // Always reap the helper, even when it hung up before reading the directive
        let status = child
            .wait()
            .map_err(|e| Self::failure(&directive, format!("failed to wait for {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(Self::failure(
                &directive,
                format!("{} exited with {}", self.program, status),
            ));
        }

        written.map_err(|e| Self::failure(&directive, format!("failed to write to {}: {}", self.program, e)))?;

        debug!("Applied '{}' via {}", directive, self.program);
        Ok(())
    }
}
