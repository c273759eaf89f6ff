//! Core data types: per-sensor readings, normalized samples, and the
//! bounded per-device history they accumulate into.

pub mod history;
pub mod reading;

pub use history::{TemperatureHistory, HISTORY_CAPACITY};
pub use reading::{SensorReading, SensorRole, TemperatureSample};
