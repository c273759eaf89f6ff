//! Capability resolution: classifying a device into a brand and model with a
//! known sensor count and layout.
//!
//! Classification is a pure function of the advertised name and service
//! UUIDs. It runs once per device at first sighting, and again only if the
//! advertised name changes. It never fails; unmatched devices resolve to
//! [`ProbeBrand::Unknown`].

use uuid::Uuid;

use crate::data::SensorRole;
use crate::protocol::uuids::{
    COMBUSTION_PROBE_STATUS_SERVICE, COMBUSTION_UART_SERVICE, KNOWN_PROBE_SERVICES,
    MEATSTICK_SERVICE,
};

/// Stable identity of a device as seen by the transport layer.
///
/// Immutable once captured; used only for classification and keying.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIdentity {
    /// Transport address (MAC or platform identifier), the tracking key.
    pub address: String,
    /// Advertised local name, possibly empty.
    pub name: String,
    /// Advertised service UUIDs.
    pub services: Vec<Uuid>,
}

impl DeviceIdentity {
    /// Create a new identity.
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        services: Vec<Uuid>,
    ) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            services,
        }
    }

    /// Whether any advertised service belongs to a known probe brand.
    pub fn has_known_service(&self) -> bool {
        self.services
            .iter()
            .any(|s| KNOWN_PROBE_SERVICES.contains(s))
    }

    /// Filtering policy mirrored from the scan layer: a device with an empty
    /// name and no known brand service carries no probe signal at all and is
    /// excluded from tracking entirely.
    pub fn has_probe_signal(&self) -> bool {
        !self.name.is_empty() || self.has_known_service()
    }
}

/// Probe brand families with documented or partially documented protocols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeBrand {
    /// MeatStick / Combustion-protocol multi-sensor probe.
    MeatStick,
    /// MeatStick charger/base station (repeater, no sensors of its own).
    MeatStickBase,
    /// Original MEATER dual-sensor probe.
    Meater,
    /// MEATER Plus (extended range, same wire format).
    MeaterPlus,
    /// MEATER Block base station.
    MeaterBlock,
    /// Inkbird BBQ thermometer (no documented wire format yet).
    Inkbird,
    /// ThermoWorks probe (no documented wire format yet).
    ThermoWorks,
    /// Weber iGrill (no documented wire format yet).
    Weber,
    /// Traeger probe (no documented wire format yet).
    Traeger,
    /// Unclassified device; eligible for the generic fallback decoder.
    Unknown,
}

/// What a resolved device can do: brand, model, and sensor layout.
///
/// Created on first payload from an unseen identity and read-only
/// afterward. Re-resolved only when the advertised name changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capability {
    /// Brand family, driving decoder selection.
    pub brand: ProbeBrand,
    /// Model string, derived from the advertised name.
    pub model: String,
    /// Number of physical sensors in the payload.
    pub sensor_count: usize,
    /// Ordered role per sensor index.
    pub layout: Vec<SensorRole>,
    /// Highest ambient temperature the hardware is rated for, °F.
    pub ambient_max_temp_f: f64,
}

impl Capability {
    /// Role of the sensor at `index`, `Unused` when outside the layout.
    pub fn role_at(&self, index: usize) -> SensorRole {
        self.layout.get(index).copied().unwrap_or(SensorRole::Unused)
    }

    fn unknown(name: &str) -> Self {
        // Unclassified devices are only guaranteed one core sensor (the
        // 2-byte fallback payload); the layout carries a second entry so
        // the 4-byte fallback's optional ambient gets a role too.
        Self {
            brand: ProbeBrand::Unknown,
            model: name.to_string(),
            sensor_count: 1,
            layout: vec![SensorRole::Core, SensorRole::Ambient],
            ambient_max_temp_f: 500.0,
        }
    }
}

/// MeatStick/Combustion 8-sensor probe layout: T1-T4 are internal core
/// sensors (T4 deepest usable), T5-T7 mid-section, T8 ambient at the handle.
fn meatstick_layout() -> Vec<SensorRole> {
    vec![
        SensorRole::Core,
        SensorRole::Core,
        SensorRole::Core,
        SensorRole::Core,
        SensorRole::Unused,
        SensorRole::Unused,
        SensorRole::Unused,
        SensorRole::Ambient,
    ]
}

/// Classify a device into a [`Capability`].
///
/// Pure and infallible: unmatched devices get [`ProbeBrand::Unknown`] with a
/// conservative single-sensor capability. The exclusion of devices with no
/// probe signal at all is the caller's policy, see
/// [`DeviceIdentity::has_probe_signal`].
pub fn resolve(identity: &DeviceIdentity) -> Capability {
    let name = identity.name.as_str();
    let name_lower = name.to_lowercase();

    let has_meatstick_service = identity.services.contains(&MEATSTICK_SERVICE)
        || identity.services.contains(&COMBUSTION_UART_SERVICE)
        || identity
            .services
            .contains(&COMBUSTION_PROBE_STATUS_SERVICE);

    if name.starts_with("cA02") {
        // Base stations relay probe data but have no sensors of their own.
        return Capability {
            brand: ProbeBrand::MeatStickBase,
            model: format!("{}_BASE", name),
            sensor_count: 0,
            layout: Vec::new(),
            ambient_max_temp_f: 0.0,
        };
    }

    if name.starts_with("cA00") || name.starts_with("Y0C") || has_meatstick_service {
        return Capability {
            brand: ProbeBrand::MeatStick,
            model: name.to_string(),
            sensor_count: 8,
            layout: meatstick_layout(),
            ambient_max_temp_f: 1000.0,
        };
    }

    if name_lower.contains("meater") {
        let (brand, sensor_count, layout) = if name_lower.contains("block") {
            (ProbeBrand::MeaterBlock, 0, Vec::new())
        } else if name_lower.contains("plus") {
            (
                ProbeBrand::MeaterPlus,
                2,
                vec![SensorRole::Core, SensorRole::Ambient],
            )
        } else {
            (
                ProbeBrand::Meater,
                2,
                vec![SensorRole::Core, SensorRole::Ambient],
            )
        };
        return Capability {
            brand,
            model: name.to_string(),
            sensor_count,
            layout,
            ambient_max_temp_f: 527.0,
        };
    }

    let other = if name_lower.contains("inkbird") || name_lower.contains("ibbq") {
        Some(ProbeBrand::Inkbird)
    } else if name_lower.contains("thermoworks") {
        Some(ProbeBrand::ThermoWorks)
    } else if name_lower.contains("igrill") || name_lower.contains("weber") {
        Some(ProbeBrand::Weber)
    } else if name_lower.contains("traeger") {
        Some(ProbeBrand::Traeger)
    } else {
        None
    };

    if let Some(brand) = other {
        return Capability {
            brand,
            model: name.to_string(),
            sensor_count: 2,
            layout: vec![SensorRole::Core, SensorRole::Ambient],
            ambient_max_temp_f: 600.0,
        };
    }

    Capability::unknown(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(name: &str) -> DeviceIdentity {
        DeviceIdentity::new("AA:BB:CC:DD:EE:FF", name, Vec::new())
    }

    #[test]
    fn test_meatstick_by_name_prefix() {
        for name in ["cA0012345678", "Y0C-4411"] {
            let cap = resolve(&identity(name));
            assert_eq!(cap.brand, ProbeBrand::MeatStick);
            assert_eq!(cap.sensor_count, 8);
            assert_eq!(cap.role_at(3), SensorRole::Core);
            assert_eq!(cap.role_at(7), SensorRole::Ambient);
            assert_eq!(cap.role_at(5), SensorRole::Unused);
        }
    }

    #[test]
    fn test_meatstick_base_station() {
        let cap = resolve(&identity("cA02998877"));
        assert_eq!(cap.brand, ProbeBrand::MeatStickBase);
        assert_eq!(cap.sensor_count, 0);
        assert_eq!(cap.model, "cA02998877_BASE");
    }

    #[test]
    fn test_meatstick_by_service_uuid() {
        let id = DeviceIdentity::new("11:22:33:44:55:66", "", vec![MEATSTICK_SERVICE]);
        let cap = resolve(&id);
        assert_eq!(cap.brand, ProbeBrand::MeatStick);
        assert!(id.has_probe_signal());
    }

    #[test]
    fn test_meater_variants_case_insensitive() {
        assert_eq!(resolve(&identity("MEATER")).brand, ProbeBrand::Meater);
        assert_eq!(
            resolve(&identity("Meater Plus")).brand,
            ProbeBrand::MeaterPlus
        );
        assert_eq!(
            resolve(&identity("MEATER Block")).brand,
            ProbeBrand::MeaterBlock
        );
    }

    #[test]
    fn test_other_known_brands() {
        assert_eq!(resolve(&identity("iBBQ-4T")).brand, ProbeBrand::Inkbird);
        assert_eq!(resolve(&identity("iGrill mini")).brand, ProbeBrand::Weber);
        assert_eq!(
            resolve(&identity("Traeger Timberline")).brand,
            ProbeBrand::Traeger
        );
    }

    #[test]
    fn test_unmatched_resolves_to_unknown() {
        let cap = resolve(&identity("LivingRoomTV"));
        assert_eq!(cap.brand, ProbeBrand::Unknown);
        // One guaranteed core sensor; the layout still assigns a role to
        // the optional ambient of a 4-byte fallback payload.
        assert_eq!(cap.sensor_count, 1);
        assert_eq!(cap.role_at(0), SensorRole::Core);
        assert_eq!(cap.role_at(1), SensorRole::Ambient);
    }

    #[test]
    fn test_empty_name_no_services_has_no_signal() {
        let id = DeviceIdentity::new("00:00:00:00:00:01", "", Vec::new());
        assert_eq!(resolve(&id).brand, ProbeBrand::Unknown);
        assert!(!id.has_probe_signal());
    }

    #[test]
    fn test_role_outside_layout_is_unused() {
        let cap = resolve(&identity("MEATER"));
        assert_eq!(cap.role_at(5), SensorRole::Unused);
    }
}
