//! Per-device rolling state: bounded history, staleness, cook progress and
//! estimated time-to-target.
//!
//! The tracker exclusively owns every `DeviceState`, keyed by transport
//! address. Each device sits behind its own `parking_lot` lock, so ingest
//! paths for different devices run in parallel with no shared mutable
//! state, and a reader can never observe the current/ambient/timestamp/
//! history quartet in a torn combination. External collaborators get
//! immutable [`DeviceSnapshot`] clones and an append-only record stream,
//! never write access.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::capability::{resolve, Capability, DeviceIdentity, ProbeBrand};
use crate::data::{SensorReading, SensorRole, TemperatureHistory, TemperatureSample};
use crate::error::Result;
use crate::protocol;
use crate::validator;

/// A reading is stale once it is strictly older than this.
pub const STALE_AFTER_SECS: i64 = 30;

/// Trailing window length for rate extrapolation.
pub const ETA_WINDOW: usize = 10;

/// Battery/signal metadata passed through from the transport layer.
///
/// Not computed here; carried onto outgoing records unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkMetadata {
    /// Battery level in percent, if the transport reported one.
    pub battery_percent: Option<u8>,
    /// Received signal strength in dBm.
    pub rssi: Option<i16>,
}

/// Outcome of one ingest cycle. None of these are errors: a cycle that
/// produces no usable reading leaves the device tracked and waiting for the
/// next notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A validated core reading was appended and the device state updated.
    Updated,
    /// Every role candidate failed validation; no state change.
    NoUsableReading,
    /// Empty name and no known service: the device is not tracked at all.
    Excluded,
}

/// Estimated time until the core temperature reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EtaEstimate {
    /// Not enough history yet to extrapolate a rate.
    Calculating,
    /// Temperature is flat or falling (or no target is set); no projection.
    NotApplicable,
    /// The target has already been reached.
    Reached,
    /// Projected time remaining at the current rate.
    Remaining(Duration),
}

impl fmt::Display for EtaEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calculating => write!(f, "Calculating..."),
            Self::NotApplicable => write!(f, "N/A"),
            Self::Reached => write!(f, "--"),
            Self::Remaining(d) => {
                let secs = d.as_secs();
                if secs >= 3600 {
                    write!(f, "{}h {}m", secs / 3600, (secs % 3600) / 60)
                } else {
                    write!(f, "{}m", (secs + 59) / 60)
                }
            }
        }
    }
}

/// One record on the append-only persistence stream, emitted per
/// successfully ingested sample.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadingRecord {
    /// Transport address of the device.
    pub device_address: String,
    /// Advertised device name.
    pub device_name: String,
    /// Resolved brand.
    pub brand: ProbeBrand,
    /// Resolved model string.
    pub model: String,
    /// Wall-clock time of the notification.
    pub timestamp: DateTime<Utc>,
    /// Index of the core sensor the sample was taken from.
    pub sensor_index: usize,
    /// Core temperature, °F.
    pub temperature_f: f64,
    /// Ambient temperature, °F, when one validated this cycle.
    pub ambient_f: Option<f64>,
    /// Battery level passthrough from the transport.
    pub battery_percent: Option<u8>,
    /// Signal strength passthrough from the transport.
    pub rssi: Option<i16>,
}

/// Internal per-device state. Only ever mutated under its own write lock.
struct DeviceState {
    identity: DeviceIdentity,
    capability: Capability,
    current_f: Option<f64>,
    target_f: Option<f64>,
    ambient_f: Option<f64>,
    last_update: Option<DateTime<Utc>>,
    history: TemperatureHistory,
    rejected_readings: u64,
}

impl DeviceState {
    fn new(identity: DeviceIdentity, capability: Capability) -> Self {
        Self {
            identity,
            capability,
            current_f: None,
            target_f: None,
            ambient_f: None,
            last_update: None,
            history: TemperatureHistory::new(),
            rejected_readings: 0,
        }
    }
}

/// Read-only snapshot of a device's state, for UI/alerting collaborators.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSnapshot {
    /// Device identity as last observed.
    pub identity: DeviceIdentity,
    /// Resolved capability.
    pub capability: Capability,
    /// Most recent validated core temperature, °F.
    pub current_f: Option<f64>,
    /// User-set target temperature, °F.
    pub target_f: Option<f64>,
    /// Most recent validated ambient temperature, °F.
    pub ambient_f: Option<f64>,
    /// Time of the last successful ingest.
    pub last_update: Option<DateTime<Utc>>,
    /// Bounded history, oldest first, for charting.
    pub history: Vec<TemperatureSample>,
    /// Validation rejections counted over the device's lifetime.
    pub rejected_readings: u64,
    /// Cook progress in `[0, 1]`.
    pub progress: f64,
    /// Estimated time to target.
    pub eta: EtaEstimate,
    /// Whether the last reading is older than the staleness threshold.
    pub stale: bool,
}

/// Tracks every known probe and derives cook metrics from its history.
pub struct DeviceTracker {
    devices: RwLock<HashMap<String, Arc<RwLock<DeviceState>>>>,
    record_tx: broadcast::Sender<ReadingRecord>,
}

impl DeviceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        let (record_tx, _) = broadcast::channel(256);
        Self {
            devices: RwLock::new(HashMap::new()),
            record_tx,
        }
    }

    /// Subscribe to the append-only stream of successfully ingested
    /// readings. A lagging or absent subscriber never blocks ingest.
    pub fn subscribe_records(&self) -> broadcast::Receiver<ReadingRecord> {
        self.record_tx.subscribe()
    }

    /// Addresses of all tracked devices.
    pub fn tracked_addresses(&self) -> Vec<String> {
        self.devices.read().keys().cloned().collect()
    }

    /// Number of tracked devices.
    pub fn tracked_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Process one transport notification end to end: classify on first
    /// sighting, decode, validate, and update state.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`](crate::DecodeError) when the payload does
    /// not match the device's wire format. Decode errors are not fatal to
    /// the device; it stays tracked and the next payload is processed
    /// normally.
    pub fn handle_notification(
        &self,
        identity: &DeviceIdentity,
        payload: &[u8],
        now: DateTime<Utc>,
        link: LinkMetadata,
    ) -> Result<IngestOutcome> {
        if !identity.has_probe_signal() {
            debug!(address = %identity.address, "no probe signal, excluding device");
            return Ok(IngestOutcome::Excluded);
        }

        let device = self.track(identity);
        let capability = device.read().capability.clone();
        let readings = protocol::decode(&capability, payload)?;
        Ok(self.ingest_into(&device, &readings, now, link))
    }

    /// Ingest already-decoded readings for a device, registering it first if
    /// needed. Applies the role-fallback policy and only mutates state when
    /// a core candidate validates.
    pub fn ingest(
        &self,
        identity: &DeviceIdentity,
        readings: &[SensorReading],
        now: DateTime<Utc>,
        link: LinkMetadata,
    ) -> IngestOutcome {
        if !identity.has_probe_signal() {
            return IngestOutcome::Excluded;
        }
        let device = self.track(identity);
        self.ingest_into(&device, readings, now, link)
    }

    /// Set or clear the user's target temperature for a device.
    ///
    /// The core never sets a target on its own.
    pub fn set_target_temperature(&self, address: &str, target_f: Option<f64>) {
        if let Some(device) = self.device(address) {
            device.write().target_f = target_f;
        }
    }

    /// Whether the device's last reading is stale.
    ///
    /// True when the device is unknown, has never produced a validated
    /// reading, or its last update is strictly more than 30 seconds old.
    pub fn is_stale(&self, address: &str, now: DateTime<Utc>) -> bool {
        match self.device(address) {
            Some(device) => match device.read().last_update {
                Some(last) => is_past_stale_threshold(last, now),
                None => true,
            },
            None => true,
        }
    }

    /// Cook progress in `[0, 1]`: zero when current or target is absent or
    /// the target is zero, otherwise `current / target` clamped.
    pub fn progress(&self, address: &str) -> f64 {
        match self.device(address) {
            Some(device) => {
                let state = device.read();
                progress_value(state.current_f, state.target_f)
            }
            None => 0.0,
        }
    }

    /// Estimated time until the core temperature reaches the target, from a
    /// rate extrapolated over the trailing history window.
    pub fn estimated_time_remaining(&self, address: &str) -> EtaEstimate {
        match self.device(address) {
            Some(device) => {
                let state = device.read();
                estimate_time_remaining(&state.history, state.current_f, state.target_f)
            }
            None => EtaEstimate::Calculating,
        }
    }

    /// Immutable snapshot of a device's state, with derived metrics
    /// evaluated at `now`. All fields are read under one lock, so the
    /// snapshot is internally consistent.
    pub fn snapshot(&self, address: &str, now: DateTime<Utc>) -> Option<DeviceSnapshot> {
        let device = self.device(address)?;
        let state = device.read();
        let stale = match state.last_update {
            Some(last) => is_past_stale_threshold(last, now),
            None => true,
        };
        Some(DeviceSnapshot {
            identity: state.identity.clone(),
            capability: state.capability.clone(),
            current_f: state.current_f,
            target_f: state.target_f,
            ambient_f: state.ambient_f,
            last_update: state.last_update,
            history: state.history.to_vec(),
            rejected_readings: state.rejected_readings,
            progress: progress_value(state.current_f, state.target_f),
            eta: estimate_time_remaining(&state.history, state.current_f, state.target_f),
            stale,
        })
    }

    fn device(&self, address: &str) -> Option<Arc<RwLock<DeviceState>>> {
        self.devices.read().get(address).cloned()
    }

    /// Get or create the state for an identity. The capability is resolved
    /// once at first sighting and re-resolved only when the advertised name
    /// changes; history survives re-resolution since the address is the
    /// stable key.
    fn track(&self, identity: &DeviceIdentity) -> Arc<RwLock<DeviceState>> {
        let mut devices = self.devices.write();
        match devices.get(identity.address.as_str()) {
            Some(device) => {
                let renamed = device.read().identity.name != identity.name;
                if renamed {
                    let capability = resolve(identity);
                    info!(
                        address = %identity.address,
                        name = %identity.name,
                        brand = ?capability.brand,
                        "advertised name changed, re-resolving capability"
                    );
                    let mut state = device.write();
                    state.identity = identity.clone();
                    state.capability = capability;
                }
                device.clone()
            }
            None => {
                let capability = resolve(identity);
                info!(
                    address = %identity.address,
                    name = %identity.name,
                    brand = ?capability.brand,
                    sensors = capability.sensor_count,
                    "tracking new device"
                );
                let device = Arc::new(RwLock::new(DeviceState::new(
                    identity.clone(),
                    capability,
                )));
                devices.insert(identity.address.clone(), device.clone());
                device
            }
        }
    }

    fn ingest_into(
        &self,
        device: &Arc<RwLock<DeviceState>>,
        readings: &[SensorReading],
        now: DateTime<Utc>,
        link: LinkMetadata,
    ) -> IngestOutcome {
        let (core, core_rejected) = select_reading(readings, SensorRole::Core);
        let (ambient, ambient_rejected) = select_reading(readings, SensorRole::Ambient);
        let rejected = core_rejected + ambient_rejected;

        let record = {
            let mut state = device.write();
            state.rejected_readings += rejected;

            let Some(core) = core else {
                debug!(
                    address = %state.identity.address,
                    rejected,
                    "no core candidate validated, skipping cycle"
                );
                return IngestOutcome::NoUsableReading;
            };

            let core_f = core.fahrenheit();
            let ambient_f = ambient.map(|r| r.fahrenheit());

            // The quartet updates together under the same write lock.
            state.current_f = Some(core_f);
            if ambient_f.is_some() {
                state.ambient_f = ambient_f;
            }
            state.last_update = Some(now);
            state
                .history
                .push(TemperatureSample::new(core_f, ambient_f, now));

            ReadingRecord {
                device_address: state.identity.address.clone(),
                device_name: state.identity.name.clone(),
                brand: state.capability.brand.clone(),
                model: state.capability.model.clone(),
                timestamp: now,
                sensor_index: core.index,
                temperature_f: core_f,
                ambient_f,
                battery_percent: link.battery_percent,
                rssi: link.rssi,
            }
        };

        let _ = self.record_tx.send(record);
        IngestOutcome::Updated
    }
}

impl Default for DeviceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Role-fallback policy: among readings tagged with `role`, prefer the
/// deepest-indexed candidate for core (and the outermost for ambient, which
/// is the same traversal since ambient sensors sit at the high indices),
/// falling back toward lower indices until one validates.
///
/// Returns the selected reading and how many candidates were rejected
/// before (and after) it.
fn select_reading(
    readings: &[SensorReading],
    role: SensorRole,
) -> (Option<&SensorReading>, u64) {
    let mut selected = None;
    let mut rejected = 0;
    for reading in readings.iter().rev().filter(|r| r.role == role) {
        if selected.is_none() && validator::is_plausible(reading.fahrenheit(), role) {
            selected = Some(reading);
        } else if selected.is_none() {
            rejected += 1;
        }
    }
    (selected, rejected)
}

/// Strictly-greater-than staleness check at millisecond resolution;
/// whole-second truncation would call a 30.5s-old reading fresh.
fn is_past_stale_threshold(last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - last).num_milliseconds() > STALE_AFTER_SECS * 1000
}

fn progress_value(current_f: Option<f64>, target_f: Option<f64>) -> f64 {
    match (current_f, target_f) {
        (Some(current), Some(target)) if target != 0.0 => (current / target).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Rate-based extrapolation over the trailing window of history.
fn estimate_time_remaining(
    history: &TemperatureHistory,
    current_f: Option<f64>,
    target_f: Option<f64>,
) -> EtaEstimate {
    if history.len() < 2 {
        return EtaEstimate::Calculating;
    }
    let (Some(current), Some(target)) = (current_f, target_f) else {
        return EtaEstimate::NotApplicable;
    };

    let window = history.len().min(ETA_WINDOW);
    let first = match history.get(history.len() - window) {
        Some(sample) => sample,
        None => return EtaEstimate::Calculating,
    };
    let last = match history.last() {
        Some(sample) => sample,
        None => return EtaEstimate::Calculating,
    };

    let elapsed = (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0;
    if elapsed <= 0.0 {
        return EtaEstimate::Calculating;
    }

    let rate = (last.temperature_f - first.temperature_f) / elapsed;
    if rate <= 0.0 {
        return EtaEstimate::NotApplicable;
    }
    if current >= target {
        return EtaEstimate::Reached;
    }

    let seconds = ((target - current) / rate).round() as u64;
    EtaEstimate::Remaining(Duration::from_secs(seconds))
}
