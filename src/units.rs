//! Temperature unit conversions.
//!
//! All history and thresholds in this crate are kept in Fahrenheit; decoders
//! produce Celsius because every documented wire formula is Celsius-native.
//! The conversion is lossless and invertible.

/// Convert Celsius to Fahrenheit.
///
/// # Example
///
/// ```
/// use bbq_probe_core::celsius_to_fahrenheit;
///
/// assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 0.001);
/// ```
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Fahrenheit to Celsius.
///
/// # Example
///
/// ```
/// use bbq_probe_core::fahrenheit_to_celsius;
///
/// assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 0.001);
/// ```
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}
