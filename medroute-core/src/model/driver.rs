//! Drivers and the qualifications that gate what they may deliver.

use std::collections::{BTreeMap, BTreeSet};

use super::{CertificationType, VehicleType};

/// Day of the week used by driver availability rotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Day {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

/// A driver's availability on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AvailabilityStatus {
    /// Not working.
    Unavailable,
    /// Working the morning only.
    AvailableMorning,
    /// Working the afternoon and evening only.
    AvailableEvening,
    /// Working the whole day.
    AvailableFullDay,
}

/// A driver who may be paired with one vehicle for a planning run.
///
/// # Examples
/// ```
/// use medroute_core::{CertificationType, Driver, VehicleType};
///
/// let driver = Driver::new("d1", "Ada")
///     .with_certification(CertificationType::HospitalBeds)
///     .with_vehicle(VehicleType::Truck);
/// assert!(driver.can_drive(VehicleType::Truck));
/// assert!(!driver.can_drive(VehicleType::Car));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Certifications held.
    pub certifications: BTreeSet<CertificationType>,
    /// Vehicle types the driver is licensed for.
    pub allowed_vehicles: BTreeSet<VehicleType>,
    /// Weekly availability rota.
    pub weekly_availability: BTreeMap<Day, AvailabilityStatus>,
}

impl Driver {
    /// Construct a driver without certifications or licences.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            certifications: BTreeSet::new(),
            allowed_vehicles: BTreeSet::new(),
            weekly_availability: BTreeMap::new(),
        }
    }

    /// Add a certification.
    #[must_use]
    pub fn with_certification(mut self, certification: CertificationType) -> Self {
        self.certifications.insert(certification);
        self
    }

    /// Add a licensed vehicle type.
    #[must_use]
    pub fn with_vehicle(mut self, vehicle_type: VehicleType) -> Self {
        self.allowed_vehicles.insert(vehicle_type);
        self
    }

    /// Whether the driver is licensed for `vehicle_type`.
    pub fn can_drive(&self, vehicle_type: VehicleType) -> bool {
        self.allowed_vehicles.contains(&vehicle_type)
    }

    /// Whether the driver holds every certification in `required`.
    pub fn holds_all(&self, required: &BTreeSet<CertificationType>) -> bool {
        required.is_subset(&self.certifications)
    }

    /// Whether the driver holds at least one certification in `wanted`.
    pub fn holds_any(&self, wanted: &BTreeSet<CertificationType>) -> bool {
        !self.certifications.is_disjoint(wanted)
    }
}
