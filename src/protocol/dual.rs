//! Dual little-endian wire format (MEATER probes).
//!
//! The payload is exactly 8 bytes of little-endian u16 fields:
//! tip at `[0..2)`, RA ambient at `[2..4)`, OA ambient at `[4..6)`, and
//! `[6..8)` reserved. The tip converts directly at 0.1°C per unit; the
//! ambient is derived from tip, RA and OA with the integer formula from
//! Nathan Faber's reverse engineering (meaterble):
//!
//! `ambient_raw = tip + max(0, ((ra - min(48, oa)) * 16 * 589) / 1487)`
//!
//! with truncating integer division, then divided by 10.0 for Celsius.

use crate::data::{SensorReading, SensorRole};
use crate::error::{DecodeError, Result};

/// Payload length in bytes.
pub const PAYLOAD_LEN: usize = 8;

/// Apply the ambient adjustment formula, in raw 0.1°C units.
fn ambient_raw(tip: u16, ra: u16, oa: u16) -> i32 {
    let adjustment = ((ra as i32 - oa.min(48) as i32) * 16 * 589) / 1487;
    tip as i32 + adjustment.max(0)
}

/// Decode an 8-byte MEATER payload into a core (tip) and a derived ambient
/// reading.
pub fn decode(payload: &[u8]) -> Result<Vec<SensorReading>> {
    if payload.len() != PAYLOAD_LEN {
        return Err(DecodeError::WrongLength {
            expected: PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    let tip = u16::from_le_bytes([payload[0], payload[1]]);
    let ra = u16::from_le_bytes([payload[2], payload[3]]);
    let oa = u16::from_le_bytes([payload[4], payload[5]]);

    let tip_celsius = tip as f64 / 10.0;
    let ambient_celsius = ambient_raw(tip, ra, oa) as f64 / 10.0;

    Ok(vec![
        SensorReading::new(0, tip_celsius, SensorRole::Core),
        SensorReading::new(1, ambient_celsius, SensorRole::Ambient),
    ])
}
