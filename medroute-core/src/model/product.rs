//! Equipment products and their delivery requirements.

use std::collections::BTreeSet;

use super::VehicleType;

/// Capability a driver needs before delivering and setting up a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CertificationType {
    /// General equipment handling.
    Basic,
    /// Oxygen and respiratory equipment.
    Respiratory,
    /// Wheelchairs and mobility aids.
    Mobility,
    /// Hospital bed assembly.
    HospitalBeds,
    /// Complex multi-part installations.
    Complex,
}

/// A deliverable product.
///
/// `historical_setup_minutes` holds observed on-site setup durations and feeds
/// [`SetupTimeEstimator`](crate::SetupTimeEstimator).
///
/// # Examples
/// ```
/// use medroute_core::{CertificationType, Product, VehicleType};
///
/// let bed = Product::new("p1", "Hospital bed", CertificationType::HospitalBeds)
///     .with_vehicle(VehicleType::Truck)
///     .with_setup_samples([30, 35, 40]);
/// assert!(bed.vehicle_types.contains(&VehicleType::Truck));
/// assert_eq!(bed.historical_setup_minutes.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Certification required to deliver the product.
    pub certification: CertificationType,
    /// Vehicle types that may carry the product.
    pub vehicle_types: BTreeSet<VehicleType>,
    /// Historical setup durations in minutes.
    pub historical_setup_minutes: Vec<u32>,
}

impl Product {
    /// Construct a product with no acceptable vehicles and no samples.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        certification: CertificationType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            certification,
            vehicle_types: BTreeSet::new(),
            historical_setup_minutes: Vec::new(),
        }
    }

    /// Add an acceptable vehicle type.
    #[must_use]
    pub fn with_vehicle(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_types.insert(vehicle_type);
        self
    }

    /// Append historical setup samples.
    #[must_use]
    pub fn with_setup_samples(mut self, samples: impl IntoIterator<Item = u32>) -> Self {
        self.historical_setup_minutes.extend(samples);
        self
    }
}
