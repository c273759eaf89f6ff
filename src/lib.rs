//! # bbq-probe-core
//!
//! Payload decoding and cook-state tracking for wireless BBQ thermometer
//! probes (MeatStick, MEATER, and friends).
//!
//! This crate is the pure core of a probe monitor: the BLE transport,
//! persistence, and UI are external collaborators. The transport hands in
//! `(DeviceIdentity, payload, timestamp)` per notification; the core
//! classifies the device once, decodes the brand-specific wire format,
//! validates the readings, and maintains a bounded per-device history from
//! which cook progress and estimated time-to-target are derived.
//!
//! ## Quick Start
//!
//! ```
//! use bbq_probe_core::{DeviceIdentity, DeviceTracker, LinkMetadata};
//! use chrono::Utc;
//!
//! let tracker = DeviceTracker::new();
//! let identity = DeviceIdentity::new("AA:BB:CC:DD:EE:FF", "MEATER", Vec::new());
//!
//! // Tip at 72.0°C, delivered by the transport layer.
//! let payload = [0xD0, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
//! tracker
//!     .handle_notification(&identity, &payload, Utc::now(), LinkMetadata::default())
//!     .unwrap();
//!
//! tracker.set_target_temperature("AA:BB:CC:DD:EE:FF", Some(203.0));
//! let snapshot = tracker.snapshot("AA:BB:CC:DD:EE:FF", Utc::now()).unwrap();
//! assert!((snapshot.current_f.unwrap() - 161.6).abs() < 0.001);
//! ```
//!
//! ## Supported wire formats
//!
//! - **Packed multi-sensor** (MeatStick/Combustion): 13 bytes holding 8
//!   consecutive 13-bit little-endian-packed fields.
//! - **Dual little-endian** (MEATER): 8 bytes of tip/RA/OA u16 values with a
//!   derived ambient temperature.
//! - **Generic fallback**: 2/4-byte little-endian payloads from devices seen
//!   before classification.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod capability;
pub mod data;
pub mod error;
pub mod protocol;
pub mod tracker;
pub mod units;
pub mod validator;

// Re-exports for convenience
pub use capability::{resolve, Capability, DeviceIdentity, ProbeBrand};
pub use data::{
    SensorReading, SensorRole, TemperatureHistory, TemperatureSample, HISTORY_CAPACITY,
};
pub use error::{DecodeError, Result};
pub use tracker::{
    DeviceSnapshot, DeviceTracker, EtaEstimate, IngestOutcome, LinkMetadata, ReadingRecord,
    ETA_WINDOW, STALE_AFTER_SECS,
};
pub use units::{celsius_to_fahrenheit, fahrenheit_to_celsius};
