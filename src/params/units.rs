//! Length units for amplitude and simulated width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Supported length units, each mapping to a multiplier into meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LengthUnit {
    Meters,
    Centimeters,
    Millimeters,
    Micrometers,
    Nanometers,
}

impl LengthUnit {
    /// Every unit, largest first (cycling order for controls)
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Meters,
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
        LengthUnit::Micrometers,
        LengthUnit::Nanometers,
    ];

    /// Multiplier converting a value in this unit to meters
    pub fn factor(self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 1e-2,
            LengthUnit::Millimeters => 1e-3,
            LengthUnit::Micrometers => 1e-6,
            LengthUnit::Nanometers => 1e-9,
        }
    }

    /// Short label used in config files and on the command line
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Micrometers => "um",
            LengthUnit::Nanometers => "nm",
        }
    }

    /// Convert a raw magnitude in this unit to meters
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Convert meters to a raw magnitude in this unit
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.factor()
    }

    /// Next unit in [`LengthUnit::ALL`], wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|u| *u == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Unit factor lookup by label.
///
/// Unknown labels are rejected rather than defaulted to 1: a silent default
/// would produce plausible-looking but physically wrong output.
pub fn unit_factor(label: &str) -> Result<f64, ConfigError> {
    label.parse::<LengthUnit>().map(LengthUnit::factor)
}

impl FromStr for LengthUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" | "meters" => Ok(LengthUnit::Meters),
            "cm" | "centimeters" => Ok(LengthUnit::Centimeters),
            "mm" | "millimeters" => Ok(LengthUnit::Millimeters),
            "um" | "µm" | "micrometers" => Ok(LengthUnit::Micrometers),
            "nm" | "nanometers" => Ok(LengthUnit::Nanometers),
            other => Err(ConfigError::UnknownUnit(other.to_string())),
        }
    }
}

impl TryFrom<String> for LengthUnit {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LengthUnit> for String {
    fn from(unit: LengthUnit) -> Self {
        unit.label().to_string()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_factors() {
        assert_eq!(unit_factor("m").unwrap(), 1.0);
        assert_relative_eq!(unit_factor("mm").unwrap(), 0.001);
        assert_relative_eq!(unit_factor("µm").unwrap(), 1e-6);
        assert_relative_eq!(unit_factor("nm").unwrap(), 1e-9);
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        assert_eq!(
            unit_factor("furlong"),
            Err(ConfigError::UnknownUnit("furlong".to_string()))
        );
    }

    #[test]
    fn test_label_round_trip() {
        for unit in LengthUnit::ALL {
            assert_eq!(unit.label().parse::<LengthUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_meter_conversion_is_reversible() {
        let unit = LengthUnit::Micrometers;
        assert_relative_eq!(unit.from_meters(unit.to_meters(250.0)), 250.0);
    }

    #[test]
    fn test_serde_rejects_unknown_label() {
        let ok: LengthUnit = serde_json::from_str("\"mm\"").unwrap();
        assert_eq!(ok, LengthUnit::Millimeters);
        assert!(serde_json::from_str::<LengthUnit>("\"yards\"").is_err());
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(LengthUnit::Nanometers.next(), LengthUnit::Meters);
        assert_eq!(LengthUnit::Meters.next(), LengthUnit::Centimeters);
    }
}
