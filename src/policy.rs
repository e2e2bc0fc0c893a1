//! Threshold policy mapping temperatures to a discrete fan level

use crate::errors::FanRegError;
use crate::sensor::TemperatureReading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed breakpoints in degrees Celsius, hottest first, paired with the level they select.
const BREAKPOINTS: [(i32, FanLevel); 5] = [
    (60, FanLevel::Six),
    (55, FanLevel::Five),
    (50, FanLevel::Four),
    (45, FanLevel::Three),
    (40, FanLevel::Two),
];

/// Commanded fan state. `Auto` hands control back to the embedded controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FanLevel {
    #[default]
    Auto,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl FanLevel {
    /// Numeric manual level, `None` for automatic control
    pub fn manual_level(self) -> Option<u8> {
        match self {
            FanLevel::Auto => None,
            FanLevel::Two => Some(2),
            FanLevel::Three => Some(3),
            FanLevel::Four => Some(4),
            FanLevel::Five => Some(5),
            FanLevel::Six => Some(6),
        }
    }

    /// Directive accepted by the ACPI fan control file
    pub fn directive(self) -> String {
        format!("level {}", self)
    }
}

impl fmt::Display for FanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.manual_level() {
            Some(level) => write!(f, "{}", level),
            None => f.write_str("auto"),
        }
    }
}

/// Degrees subtracted from every breakpoint before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdModifier {
    /// 5 degrees
    Med,
    /// 10 degrees
    #[default]
    Ext,
    /// 20 degrees
    Max,
}

impl ThresholdModifier {
    pub fn degrees(self) -> i32 {
        match self {
            ThresholdModifier::Med => 5,
            ThresholdModifier::Ext => 10,
            ThresholdModifier::Max => 20,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ThresholdModifier::Med => "med",
            ThresholdModifier::Ext => "ext",
            ThresholdModifier::Max => "max",
        }
    }
}

impl fmt::Display for ThresholdModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (-{}°C)", self.token(), self.degrees())
    }
}

impl FromStr for ThresholdModifier {
    type Err = FanRegError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "ext" => Ok(ThresholdModifier::Ext),
            "med" => Ok(ThresholdModifier::Med),
            "max" => Ok(ThresholdModifier::Max),
            other => Err(FanRegError::ConfigUnknownValue {
                value: other.to_string(),
            }),
        }
    }
}

/// Pick the fan level for the hottest sensor.
///
/// A temperature exactly on a shifted breakpoint falls to the lower level.
pub fn decide(readings: &TemperatureReading, modifier: ThresholdModifier) -> FanLevel {
    let max_temp = readings.max();
    let shift = modifier.degrees();

    BREAKPOINTS
        .iter()
        .find(|(breakpoint, _)| max_temp > breakpoint - shift)
        .map(|&(_, level)| level)
        .unwrap_or(FanLevel::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFIERS: [ThresholdModifier; 3] = [
        ThresholdModifier::Med,
        ThresholdModifier::Ext,
        ThresholdModifier::Max,
    ];

    fn uniform(temp: i32) -> TemperatureReading {
        TemperatureReading::new([temp; 8])
    }

    #[test]
    fn test_single_hot_zone_selects_top_level() {
        let readings = TemperatureReading::new([30, 30, 30, 30, 30, 30, 30, 65]);
        assert_eq!(decide(&readings, ThresholdModifier::Ext), FanLevel::Six);
    }

    #[test]
    fn test_documented_scenarios() {
        // 44 clears 50-10 but not 55-10
        assert_eq!(decide(&uniform(44), ThresholdModifier::Ext), FanLevel::Four);
        assert_eq!(decide(&uniform(40), ThresholdModifier::Ext), FanLevel::Three);
        assert_eq!(decide(&uniform(42), ThresholdModifier::Med), FanLevel::Three);
    }

    #[test]
    fn test_breakpoint_ties_fall_to_lower_level() {
        let m = ThresholdModifier::Ext;
        assert_eq!(decide(&uniform(50), m), FanLevel::Five);
        assert_eq!(decide(&uniform(51), m), FanLevel::Six);
        assert_eq!(decide(&uniform(30), m), FanLevel::Auto);
        assert_eq!(decide(&uniform(31), m), FanLevel::Two);
    }

    #[test]
    fn test_cool_readings_stay_auto() {
        for m in MODIFIERS {
            for temp in -128..=(40 - m.degrees()) {
                assert_eq!(decide(&uniform(temp), m), FanLevel::Auto, "{} at {}", m, temp);
            }
        }
    }

    #[test]
    fn test_modifier_applies_to_every_breakpoint() {
        let m = ThresholdModifier::Max;
        assert_eq!(decide(&uniform(21), m), FanLevel::Two);
        assert_eq!(decide(&uniform(26), m), FanLevel::Three);
        assert_eq!(decide(&uniform(31), m), FanLevel::Four);
        assert_eq!(decide(&uniform(36), m), FanLevel::Five);
        assert_eq!(decide(&uniform(41), m), FanLevel::Six);
    }

    #[test]
    fn test_decide_is_monotonic_per_sensor() {
        let base = [35, -128, 20, 41, 0, 38, 29, 33];
        for m in MODIFIERS {
            for zone in 0..8 {
                let mut previous = FanLevel::Auto;
                for temp in -130..=120 {
                    let mut temps = base;
                    temps[zone] = temp;
                    let level = decide(&TemperatureReading::new(temps), m);
                    assert!(level >= previous, "zone {} at {} dropped to {}", zone, temp, level);
                    previous = level;
                }
            }
        }
    }

    #[test]
    fn test_sentinel_values_do_not_dominate() {
        let readings = TemperatureReading::new([-128, -128, 42, -128, -128, -128, -128, -128]);
        assert_eq!(decide(&readings, ThresholdModifier::Ext), FanLevel::Four);
    }

    #[test]
    fn test_directives() {
        assert_eq!(FanLevel::Auto.directive(), "level auto");
        assert_eq!(FanLevel::Four.directive(), "level 4");
        assert_eq!(FanLevel::Six.manual_level(), Some(6));
    }

    #[test]
    fn test_modifier_tokens() {
        assert_eq!("ext".parse::<ThresholdModifier>().unwrap().degrees(), 10);
        assert_eq!("med".parse::<ThresholdModifier>().unwrap().degrees(), 5);
        assert_eq!("max".parse::<ThresholdModifier>().unwrap().degrees(), 20);
        assert!(matches!(
            "lo".parse::<ThresholdModifier>(),
            Err(FanRegError::ConfigUnknownValue { .. })
        ));
        assert_eq!(ThresholdModifier::default(), ThresholdModifier::Ext);
    }
}
