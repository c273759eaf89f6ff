//! Advertised service and characteristic UUIDs for supported probe brands.
//!
//! These are only consumed for capability classification; subscribing to
//! them is the transport layer's job.

use uuid::{uuid, Uuid};

/// Combustion Inc probe status service (current MeatStick firmware).
pub const COMBUSTION_PROBE_STATUS_SERVICE: Uuid = uuid!("00000100-CAAB-3792-3D44-97AE51C1407A");

/// Nordic UART service used by MeatStick probes for commands.
pub const COMBUSTION_UART_SERVICE: Uuid = uuid!("6E400001-B5A3-F393-E0A9-E50E24DCCA9E");

/// Nordic UART RX characteristic (device-to-host notifications).
pub const COMBUSTION_UART_RX_CHAR: Uuid = uuid!("6E400002-B5A3-F393-E0A9-E50E24DCCA9E");

/// Nordic UART TX characteristic (host-to-device writes).
pub const COMBUSTION_UART_TX_CHAR: Uuid = uuid!("6E400003-B5A3-F393-E0A9-E50E24DCCA9E");

/// Legacy MeatStick temperature service (older firmware).
pub const MEATSTICK_SERVICE: Uuid = uuid!("8D53DC1D-1DB7-4CD3-868B-8A527460AA84");

/// Legacy MeatStick temperature characteristic.
pub const MEATSTICK_CHAR: Uuid = uuid!("DA2E7828-FBCE-4E01-AE9E-261174997C48");

/// MEATER temperature service (reverse engineered).
pub const MEATER_SERVICE: Uuid = uuid!("A75CC7FC-C956-488F-AC2A-2DBC08B63A04");

/// Services whose presence alone marks a device as a known probe.
pub const KNOWN_PROBE_SERVICES: [Uuid; 4] = [
    COMBUSTION_PROBE_STATUS_SERVICE,
    COMBUSTION_UART_SERVICE,
    MEATSTICK_SERVICE,
    MEATER_SERVICE,
];
