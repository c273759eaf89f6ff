//! End-to-end scenario: a MeatStick probe from first notification through
//! decode, validation, state tracking, and derived metrics.

use bbq_probe_core::{
    DeviceIdentity, DeviceTracker, EtaEstimate, IngestOutcome, LinkMetadata, ProbeBrand,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Pack 8 raw 13-bit values into the MeatStick little-endian bit stream.
fn pack_payload(values: [u16; 8]) -> [u8; 13] {
    let mut out = [0u8; 13];
    for (i, &v) in values.iter().enumerate() {
        let bit = i * 13;
        let merged = ((v as u32) & 0x1FFF) << (bit % 8);
        let byte = bit / 8;
        out[byte] |= merged as u8;
        if byte + 1 < 13 {
            out[byte + 1] |= (merged >> 8) as u8;
        }
        if byte + 2 < 13 {
            out[byte + 2] |= (merged >> 16) as u8;
        }
    }
    out
}

fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

#[test]
fn meatstick_cook_cycle() {
    let tracker = DeviceTracker::new();
    let mut records = tracker.subscribe_records();
    let identity = DeviceIdentity::new("40:51:6C:01:02:03", "cA0012345678", Vec::new());
    let t0 = start();

    // Raw 4000 on every sensor: 4000 * 0.05 - 20 = 180.0°C = 356.0°F.
    let payload = pack_payload([4000; 8]);
    let outcome = tracker
        .handle_notification(&identity, &payload, t0, LinkMetadata::default())
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Updated);

    let snap = tracker.snapshot(&identity.address, t0).unwrap();
    assert_eq!(snap.capability.brand, ProbeBrand::MeatStick);
    assert_eq!(snap.capability.sensor_count, 8);
    assert!((snap.current_f.unwrap() - 356.0).abs() < 1e-9);
    // The ambient sensor (index 7) carried the same raw value.
    assert!((snap.ambient_f.unwrap() - 356.0).abs() < 1e-9);
    assert_eq!(snap.history.len(), 1);
    assert!(!snap.stale);

    // One record per ingested sample, from the deepest core sensor (T4).
    let record = records.try_recv().unwrap();
    assert_eq!(record.device_address, identity.address);
    assert_eq!(record.sensor_index, 3);
    assert!((record.temperature_f - 356.0).abs() < 1e-9);

    // Two seconds later the temperature dips: rate over the window is
    // negative, so no ETA can be projected.
    tracker.set_target_temperature(&identity.address, Some(400.0));
    let cooler = pack_payload([3900; 8]); // 175.0°C = 347.0°F
    let outcome = tracker
        .handle_notification(
            &identity,
            &cooler,
            t0 + Duration::seconds(2),
            LinkMetadata::default(),
        )
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Updated);
    assert_eq!(
        tracker.estimated_time_remaining(&identity.address),
        EtaEstimate::NotApplicable
    );

    // Progress still reflects current over target, clamped.
    assert!((tracker.progress(&identity.address) - 347.0 / 400.0).abs() < 1e-6);
}

#[test]
fn malformed_payload_never_mutates_state() {
    let tracker = DeviceTracker::new();
    let identity = DeviceIdentity::new("40:51:6C:0A:0B:0C", "cA00AAAA0001", Vec::new());
    let t0 = start();

    let err = tracker
        .handle_notification(&identity, &[0u8; 5], t0, LinkMetadata::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "wrong payload length: expected 13 bytes, got 5");

    // The device is tracked but has no reading and stays "Calculating".
    let snap = tracker.snapshot(&identity.address, t0).unwrap();
    assert!(snap.current_f.is_none());
    assert!(snap.history.is_empty());
    assert!(snap.stale);
    assert_eq!(snap.eta, EtaEstimate::Calculating);

    // A later well-formed payload is processed normally.
    let payload = pack_payload([844; 8]); // 22.2°C = 71.96°F
    let outcome = tracker
        .handle_notification(&identity, &payload, t0, LinkMetadata::default())
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Updated);
    let snap = tracker.snapshot(&identity.address, t0).unwrap();
    assert!((snap.current_f.unwrap() - 71.96).abs() < 1e-9);
}

#[test]
fn rising_cook_produces_concrete_eta() {
    let tracker = DeviceTracker::new();
    let identity = DeviceIdentity::new("40:51:6C:0D:0E:0F", "cA00BBBB0002", Vec::new());
    let t0 = start();

    // Targets are per tracked device; nothing exists yet to set one on.
    tracker.set_target_temperature(&identity.address, Some(250.0));
    assert_eq!(tracker.tracked_count(), 0);

    // Climb 0.1°C (raw +2) per second from 100.0°C.
    for tick in 0..10u16 {
        let payload = pack_payload([2400 + tick * 2; 8]);
        tracker
            .handle_notification(
                &identity,
                &payload,
                t0 + Duration::seconds(tick as i64),
                LinkMetadata::default(),
            )
            .unwrap();
    }
    tracker.set_target_temperature(&identity.address, Some(250.0));

    // Window: 212.0°F at t0 to 213.62°F at t0+9s -> 0.18°F/s.
    // Remaining: (250 - 213.62) / 0.18 = 202.1 -> 202s.
    match tracker.estimated_time_remaining(&identity.address) {
        EtaEstimate::Remaining(d) => assert_eq!(d.as_secs(), 202),
        other => panic!("expected a projection, got {other:?}"),
    }
}
