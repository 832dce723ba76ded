//! Core data types for generated readings
//!
//! - `Reading`: one immutable data point (value + capture timestamp)
//! - `ValueRange`: closed interval the generator draws from
//! - `TemperatureUnit`: unit used when a reading is displayed

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format for reading timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single generated reading
///
/// Values are stored in degrees Celsius. Fields are private so a reading
/// cannot change after it is created.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Reading {
    value: f64,
    timestamp: DateTime<Local>,
}

impl Reading {
    /// Create a reading captured now
    pub fn new(value: f64) -> Self {
        Self::with_timestamp(value, Local::now())
    }

    /// Create a reading with a specific capture time
    pub fn with_timestamp(value: f64, timestamp: DateTime<Local>) -> Self {
        Self { value, timestamp }
    }

    /// Raw value in degrees Celsius
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Capture time
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Value converted to `unit`
    pub fn value_in(&self, unit: TemperatureUnit) -> f64 {
        unit.from_celsius(self.value)
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Closed interval `[min, max]` of generated values, in Celsius
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds finite, `min <= max`, and the width itself finite
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && (self.max - self.min).is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        // Winter afternoon in Omaha, NE
        Self { min: 0.0, max: 5.0 }
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Unit used when displaying a reading
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Short suffix used by the text views
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "celsius"),
            TemperatureUnit::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}
