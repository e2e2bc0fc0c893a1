//! Error types for the fan regulator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the fan regulator
pub type Result<T> = std::result::Result<T, FanRegError>;

/// Main error type for the fan regulator
#[derive(Error, Debug)]
pub enum FanRegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Sensor source {} unavailable: {source}", .path.display())]
    SensorUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed sensor reading: expected 8 temperatures, parsed {parsed} from {line:?}")]
    MalformedReading { parsed: usize, line: String },

    #[error("Config source {} unavailable: {source}", .path.display())]
    ConfigUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config line {line:?}, expected param=<ext|med|max>")]
    ConfigMalformed { line: String },

    #[error("Unknown config value {value:?}, expected one of ext, med, max")]
    ConfigUnknownValue { value: String },

    #[error("Fan actuator failed to apply {directive:?}: {reason}")]
    Actuator { directive: String, reason: String },

    #[error("Failed to install signal handler for {signal}: {source}")]
    SignalSetup {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },
}
