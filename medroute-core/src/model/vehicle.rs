//! Vehicles available to carry equipment from the depot.

use std::collections::BTreeSet;

/// Body type of a vehicle.
///
/// Products restrict which of these may carry them and drivers are licensed
/// for a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleType {
    /// Passenger car.
    Car,
    /// Truck with room for bulky equipment.
    Truck,
}

impl VehicleType {
    /// Every vehicle type, in declaration order.
    pub const ALL: [Self; 2] = [Self::Car, Self::Truck];

    /// Return every vehicle type as a set.
    ///
    /// # Examples
    /// ```
    /// use medroute_core::VehicleType;
    ///
    /// let all = VehicleType::all();
    /// assert!(all.contains(&VehicleType::Car));
    /// assert!(all.contains(&VehicleType::Truck));
    /// ```
    pub fn all() -> BTreeSet<Self> {
        Self::ALL.into_iter().collect()
    }
}

/// Coarse load class of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleCapacity {
    /// Small load space.
    Small,
    /// Medium load space.
    #[default]
    Medium,
    /// Large load space.
    Large,
}

/// Optional equipment fitted to a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleFeature {
    /// Temperature-controlled load space.
    ClimateControl,
    /// Live GPS tracking.
    GpsTracking,
    /// Restraints and safety kit for heavy items.
    SafetyEquipment,
    /// Hydraulic lift gate.
    LiftGate,
}

/// A vehicle in the delivery fleet.
///
/// # Examples
/// ```
/// use medroute_core::{Vehicle, VehicleType};
///
/// let truck = Vehicle::new("v1", VehicleType::Truck);
/// assert_eq!(truck.id, "v1");
/// assert!(truck.features.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Unique identifier.
    pub id: String,
    /// Body type used for compatibility checks.
    pub vehicle_type: VehicleType,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: u16,
    /// Load class.
    pub capacity: VehicleCapacity,
    /// Fitted equipment.
    pub features: BTreeSet<VehicleFeature>,
}

impl Vehicle {
    /// Construct a vehicle with empty descriptive fields.
    pub fn new(id: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            id: id.into(),
            vehicle_type,
            make: String::new(),
            model: String::new(),
            year: 0,
            capacity: VehicleCapacity::default(),
            features: BTreeSet::new(),
        }
    }
}
