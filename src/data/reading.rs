//! Per-sensor readings and normalized history samples.

use chrono::{DateTime, Utc};

use crate::units::celsius_to_fahrenheit;

/// The role a physical sensor plays in a probe's layout.
///
/// Layouts are declared per capability as an ordered list of roles, one per
/// sensor index, so adding a new device means declaring a layout rather than
/// editing parsing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorRole {
    /// Internal sensor measuring the food itself.
    Core,
    /// Chamber/grill/surface sensor outside the food.
    Ambient,
    /// Present on the wire but not used for any derived value.
    #[default]
    Unused,
}

/// A single calibrated temperature reading produced by a decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Sensor index within the payload (0 is the deepest/tip sensor).
    pub index: usize,
    /// Calibrated temperature in degrees Celsius.
    pub celsius: f64,
    /// Role assigned from the capability layout.
    pub role: SensorRole,
}

impl SensorReading {
    /// Create a new reading.
    pub fn new(index: usize, celsius: f64, role: SensorRole) -> Self {
        Self {
            index,
            celsius,
            role,
        }
    }

    /// The reading in degrees Fahrenheit.
    pub fn fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.celsius)
    }
}

/// The normalized unit stored in per-device history.
///
/// `temperature_f` is always present; `ambient_f` is independently optional.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureSample {
    /// Selected core temperature in degrees Fahrenheit.
    pub temperature_f: f64,
    /// Selected ambient temperature in degrees Fahrenheit, if one validated.
    pub ambient_f: Option<f64>,
    /// Wall-clock time the notification was received.
    pub timestamp: DateTime<Utc>,
}

impl TemperatureSample {
    /// Create a new sample.
    pub fn new(temperature_f: f64, ambient_f: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            temperature_f,
            ambient_f,
            timestamp,
        }
    }
}
