//! Brand-specific payload decoders.
//!
//! Pure functions from a fixed-length byte payload to calibrated
//! [`SensorReading`]s. Decoder selection is driven by the resolved
//! [`Capability`]: a resolved brand always wins over the generic fallback,
//! and brands without a documented wire format fail with
//! [`DecodeError::UnrecognizedFormat`] rather than guessing. Decoding never
//! panics on malformed input.

pub mod dual;
pub mod packed;
pub mod uuids;

use tracing::trace;

use crate::capability::{Capability, ProbeBrand};
use crate::data::{SensorReading, SensorRole};
use crate::error::{DecodeError, Result};

/// Decode a raw payload according to the device's resolved capability.
///
/// - MeatStick family: 13-byte packed multi-sensor format.
/// - MEATER family: 8-byte dual little-endian format.
/// - Unknown devices: generic 2/4-byte fallback.
/// - Recognized brands without a documented format: `UnrecognizedFormat`.
pub fn decode(capability: &Capability, payload: &[u8]) -> Result<Vec<SensorReading>> {
    trace!(
        brand = ?capability.brand,
        len = payload.len(),
        data = ?payload,
        "decoding payload"
    );

    match capability.brand {
        ProbeBrand::MeatStick | ProbeBrand::MeatStickBase => packed::decode(capability, payload),
        ProbeBrand::Meater | ProbeBrand::MeaterPlus | ProbeBrand::MeaterBlock => {
            dual::decode(payload)
        }
        ProbeBrand::Unknown => decode_generic(payload),
        // No documented format: never route a recognized brand through the
        // generic fallback.
        ProbeBrand::Inkbird
        | ProbeBrand::ThermoWorks
        | ProbeBrand::Weber
        | ProbeBrand::Traeger => Err(DecodeError::UnrecognizedFormat {
            length: payload.len(),
        }),
    }
}

/// Generic fallback for devices seen in the wild before classification:
/// one or two little-endian u16 values at 0.1°C per unit.
fn decode_generic(payload: &[u8]) -> Result<Vec<SensorReading>> {
    match payload.len() {
        2 => {
            let raw = u16::from_le_bytes([payload[0], payload[1]]);
            Ok(vec![SensorReading::new(
                0,
                raw as f64 / 10.0,
                SensorRole::Core,
            )])
        }
        4 => {
            let core = u16::from_le_bytes([payload[0], payload[1]]);
            let ambient = u16::from_le_bytes([payload[2], payload[3]]);
            Ok(vec![
                SensorReading::new(0, core as f64 / 10.0, SensorRole::Core),
                SensorReading::new(1, ambient as f64 / 10.0, SensorRole::Ambient),
            ])
        }
        other => Err(DecodeError::UnrecognizedFormat { length: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{resolve, DeviceIdentity};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn capability_for(name: &str) -> Capability {
        resolve(&DeviceIdentity::new("AA:BB:CC:DD:EE:FF", name, Vec::new()))
    }

    #[test]
    fn test_fallback_two_bytes_single_core() {
        let cap = capability_for("SomethingGeneric");
        // 222 -> 22.2°C
        let readings = decode(&cap, &[0xDE, 0x00]).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].role, SensorRole::Core);
        assert!((readings[0].celsius - 22.2).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_four_bytes_core_and_ambient() {
        let cap = capability_for("SomethingGeneric");
        let readings = decode(&cap, &[0xDE, 0x00, 0x2C, 0x01]).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].role, SensorRole::Ambient);
        assert!((readings[1].celsius - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_never_used_for_recognized_brand() {
        // A Weber payload that would fit the 4-byte fallback still fails.
        let cap = capability_for("iGrill mini");
        assert_eq!(
            decode(&cap, &[0xDE, 0x00, 0x2C, 0x01]),
            Err(DecodeError::UnrecognizedFormat { length: 4 })
        );
    }

    #[test]
    fn test_unknown_device_odd_length_unrecognized() {
        let cap = capability_for("SomethingGeneric");
        for len in [0usize, 1, 3, 5, 8, 13, 32] {
            // 8 and 13 byte shapes belong to resolved brands only.
            let payload = vec![1u8; len];
            assert_eq!(
                decode(&cap, &payload),
                Err(DecodeError::UnrecognizedFormat { length: len })
            );
        }
    }

    proptest! {
        /// Decoding never panics, whatever the payload and brand.
        #[test]
        fn prop_decode_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
            for name in ["cA0012345678", "MEATER", "iGrill mini", "Generic"] {
                let _ = decode(&capability_for(name), &payload);
            }
        }

        /// Valid 13-byte payloads always yield 8 readings, indices 0..8.
        #[test]
        fn prop_packed_always_eight_readings(payload in proptest::collection::vec(any::<u8>(), 13)) {
            let readings = decode(&capability_for("cA0012345678"), &payload).unwrap();
            prop_assert_eq!(readings.len(), 8);
            for (i, reading) in readings.iter().enumerate() {
                prop_assert_eq!(reading.index, i);
                prop_assert!(reading.celsius >= -20.0);
                prop_assert!(reading.celsius <= 389.55 + 1e-9);
            }
        }
    }
}
