//! Range and sanity checks for decoded readings.
//!
//! A rejected reading never mutates device state; the tracker counts
//! rejections per device for observability.

use crate::data::SensorRole;

/// Lowest plausible reading for any sensor, °F.
pub const MIN_TEMP_F: f64 = -40.0;

/// Highest plausible internal (core) reading, °F.
pub const MAX_CORE_TEMP_F: f64 = 600.0;

/// Highest plausible ambient/chamber reading, °F.
pub const MAX_AMBIENT_TEMP_F: f64 = 1100.0;

/// Whether a reading is plausible for its role.
///
/// Exactly 0°F is the sensor-not-present sentinel and is rejected for every
/// role. `Unused` sensors are never usable.
pub fn is_plausible(temperature_f: f64, role: SensorRole) -> bool {
    if temperature_f == 0.0 {
        return false;
    }
    match role {
        SensorRole::Core => (MIN_TEMP_F..=MAX_CORE_TEMP_F).contains(&temperature_f),
        SensorRole::Ambient => (MIN_TEMP_F..=MAX_AMBIENT_TEMP_F).contains(&temperature_f),
        SensorRole::Unused => false,
    }
}
