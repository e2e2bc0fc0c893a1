//! Fan Regulator
//!
//! A ThinkPad fan regulator daemon that steps `/proc/acpi/ibm/fan` through fixed
//! temperature thresholds and hands control back to the firmware on exit.

pub mod actuator;
pub mod args;
pub mod config;
pub mod daemon;
pub mod errors;
pub mod logging;
pub mod pidfile;
pub mod policy;
pub mod sensor;
pub mod settings;

// Re-export commonly used types
pub use errors::{FanRegError, Result};
pub use policy::{decide, FanLevel, ThresholdModifier};
pub use sensor::TemperatureReading;
