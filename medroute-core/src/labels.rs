//! Human-readable labels for enumerated tags.
//!
//! The enums in [`crate::model`] are plain tags. Presentation layers look up
//! their display strings here so that wording can change without touching
//! the domain types.
//!
//! # Examples
//! ```
//! use medroute_core::labels::label;
//! use medroute_core::{CertificationType, VehicleFeature};
//!
//! assert_eq!(label(CertificationType::HospitalBeds), "Hospital Beds");
//! assert_eq!(label(VehicleFeature::GpsTracking), "GPS Tracking");
//! ```

use crate::model::{
    AvailabilityStatus, CertificationType, Day, OrderPriority, TimeWindow, VehicleCapacity,
    VehicleFeature, VehicleType,
};

/// A tag with a static display table.
pub trait Labelled: Copy + PartialEq + 'static {
    /// Every tag paired with its display string.
    const LABELS: &'static [(Self, &'static str)];
}

/// Return the display string for `tag`, or an empty string when the table
/// has no entry.
pub fn label<T: Labelled>(tag: T) -> &'static str {
    T::LABELS
        .iter()
        .find(|(candidate, _)| *candidate == tag)
        .map_or("", |&(_, text)| text)
}

impl Labelled for CertificationType {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::Basic, "Basic"),
        (Self::Respiratory, "Respiratory"),
        (Self::Mobility, "Mobility"),
        (Self::HospitalBeds, "Hospital Beds"),
        (Self::Complex, "Complex"),
    ];
}

impl Labelled for VehicleType {
    const LABELS: &'static [(Self, &'static str)] = &[(Self::Car, "Car"), (Self::Truck, "Truck")];
}

impl Labelled for VehicleCapacity {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::Small, "Small"),
        (Self::Medium, "Medium"),
        (Self::Large, "Large"),
    ];
}

impl Labelled for VehicleFeature {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::ClimateControl, "Climate Control"),
        (Self::GpsTracking, "GPS Tracking"),
        (Self::SafetyEquipment, "Safety Equipment"),
        (Self::LiftGate, "Lift Gate"),
    ];
}

impl Labelled for OrderPriority {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::Low, "Low"),
        (Self::Medium, "Medium"),
        (Self::High, "High"),
    ];
}

impl Labelled for TimeWindow {
    const LABELS: &'static [(Self, &'static str)] =
        &[(Self::Morning, "Morning"), (Self::Afternoon, "Afternoon")];
}

impl Labelled for AvailabilityStatus {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::Unavailable, "Unavailable"),
        (Self::AvailableMorning, "Available Morning"),
        (Self::AvailableEvening, "Available Evening"),
        (Self::AvailableFullDay, "Available Full Day"),
    ];
}

impl Labelled for Day {
    const LABELS: &'static [(Self, &'static str)] = &[
        (Self::Monday, "Monday"),
        (Self::Tuesday, "Tuesday"),
        (Self::Wednesday, "Wednesday"),
        (Self::Thursday, "Thursday"),
        (Self::Friday, "Friday"),
        (Self::Saturday, "Saturday"),
        (Self::Sunday, "Sunday"),
    ];
}
