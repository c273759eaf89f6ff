//! Packed multi-sensor wire format (MeatStick / Combustion protocol).
//!
//! The payload is exactly 13 bytes (104 bits) holding 8 consecutive 13-bit
//! unsigned fields in a little-endian bit stream: bit 0 is the LSB of byte
//! 0, and sensor `i` occupies bits `[13*i, 13*i + 13)`. Each field is in
//! `[0, 8191]` and converts as `celsius = raw * 0.05 - 20.0`, a range of
//! -20.0°C to 389.55°C (documented usable range tops out at 369°C; raw
//! values near the ceiling come from sensors that are not physically
//! present and are left to the validator to reject).

use crate::capability::Capability;
use crate::data::SensorReading;
use crate::error::{DecodeError, Result};

/// Payload length in bytes.
pub const PAYLOAD_LEN: usize = 13;

/// Number of 13-bit sensor fields in a payload.
pub const SENSOR_COUNT: usize = 8;

const FIELD_BITS: usize = 13;
const FIELD_MASK: u32 = 0x1FFF;

/// Extract the 13-bit field for sensor `index` from the bit stream.
fn unpack_field(data: &[u8; PAYLOAD_LEN], index: usize) -> u16 {
    let bit = index * FIELD_BITS;
    let byte = bit / 8;
    let shift = bit % 8;

    // A field spans at most 3 bytes; reads past the payload end contribute
    // zero bits, which only happens above bit 104 and is masked off anyway.
    let b0 = data[byte] as u32;
    let b1 = data.get(byte + 1).copied().unwrap_or(0) as u32;
    let b2 = data.get(byte + 2).copied().unwrap_or(0) as u32;

    (((b0 | (b1 << 8) | (b2 << 16)) >> shift) & FIELD_MASK) as u16
}

/// Convert a raw 13-bit field to Celsius.
#[inline]
pub fn raw_to_celsius(raw: u16) -> f64 {
    raw as f64 * 0.05 - 20.0
}

/// Decode a packed 13-byte payload into 8 readings in sensor-index order.
///
/// Roles come from the capability layout; the decoder emits every sensor
/// and leaves role selection policy to the state tracker.
pub fn decode(capability: &Capability, payload: &[u8]) -> Result<Vec<SensorReading>> {
    let data: &[u8; PAYLOAD_LEN] =
        payload
            .try_into()
            .map_err(|_| DecodeError::WrongLength {
                expected: PAYLOAD_LEN,
                actual: payload.len(),
            })?;

    Ok((0..SENSOR_COUNT)
        .map(|i| {
            let raw = unpack_field(data, i);
            SensorReading::new(i, raw_to_celsius(raw), capability.role_at(i))
        })
        .collect())
}
