//! Unit constants and conversions
//!
//! Device coordinates are expressed in mils (thousandths of an inch).
//! Incoming millimeter or inch values are scaled into that space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device units per millimeter.
pub const MILS_PER_MM: f64 = 39.3701;

/// Device units per inch.
pub const MILS_PER_INCH: f64 = 1000.0;

/// Measurement system of incoming linear values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// Device units per one unit of this system.
    pub fn mils_per_unit(self) -> f64 {
        match self {
            Self::Metric => MILS_PER_MM,
            Self::Imperial => MILS_PER_INCH,
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a duration in seconds as `H:MM:SS`.
///
/// Fractional seconds are truncated. Infinite or NaN durations (a zero
/// speed) render as `"∞"`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "∞".to_string();
    }
    let total = seconds.max(0.0) as u64;
    let (minutes, secs) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}
