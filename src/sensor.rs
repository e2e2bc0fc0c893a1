//! Thermal sensor reading from the ThinkPad ACPI interface

use crate::errors::{FanRegError, Result};
use log::trace;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Number of thermal zones reported per reading
pub const SENSOR_COUNT: usize = 8;

/// One sample of every thermal zone, in degrees Celsius.
///
/// Disconnected zones usually report `-128`; those values are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReading([i32; SENSOR_COUNT]);

impl TemperatureReading {
    pub fn new(temps: [i32; SENSOR_COUNT]) -> Self {
        Self(temps)
    }

    pub fn temps(&self) -> &[i32; SENSOR_COUNT] {
        &self.0
    }

    /// Hottest zone
    pub fn max(&self) -> i32 {
        self.0.iter().copied().max().unwrap_or(i32::MIN)
    }

    /// Parse a line such as `temperatures:\t45 -128 40 0 38 0 33 0`.
    ///
    /// Integers are taken after the label until the first token that is not one.
    /// Anything past the eighth value is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let mut temps = [0i32; SENSOR_COUNT];
        let mut parsed = 0;

        if tokens.next().is_some() {
            for (slot, token) in temps.iter_mut().zip(tokens) {
                match token.parse::<i32>() {
                    Ok(value) => {
                        *slot = value;
                        parsed += 1;
                    }
                    Err(_) => break,
                }
            }
        }

        if parsed < SENSOR_COUNT {
            return Err(FanRegError::MalformedReading {
                parsed,
                line: line.trim_end().to_string(),
            });
        }

        Ok(Self(temps))
    }
}

/// Source of temperature readings
pub trait SensorReader {
    /// Take one reading. No retries; the caller decides when to try again.
    fn read(&mut self) -> Result<TemperatureReading>;
}

/// Reads the first line of a thermal file such as `/proc/acpi/ibm/thermal`
#[derive(Debug, Clone)]
pub struct ThermalFile {
    path: PathBuf,
}

impl ThermalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: std::io::Error) -> FanRegError {
        FanRegError::SensorUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl SensorReader for ThermalFile {
    fn read(&mut self) -> Result<TemperatureReading> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;

        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|e| self.unavailable(e))?;

        let reading = TemperatureReading::parse(&line)?;
        trace!("Read temperatures {:?} from {}", reading.temps(), self.path.display());
        Ok(reading)
    }
}
