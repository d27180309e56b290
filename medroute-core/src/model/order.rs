//! Patient orders awaiting delivery.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use geo::Coord;

/// Part of the day in which a patient can receive a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeWindow {
    /// First half of the working day.
    Morning,
    /// Second half of the working day.
    Afternoon,
}

/// Business priority of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderPriority {
    /// Can slip.
    Low,
    /// Normal.
    #[default]
    Medium,
    /// Urgent.
    High,
}

/// An order for equipment to be delivered and set up at a patient's home.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use medroute_core::{Order, TimeWindow};
///
/// let order = Order::new("o1", Coord { x: -0.12, y: 51.5 })
///     .with_product("p1")
///     .with_time_window(TimeWindow::Morning);
/// assert_eq!(order.product_ids, vec!["p1".to_owned()]);
/// assert!(order.available_times.contains(&TimeWindow::Morning));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Unique identifier.
    pub id: String,
    /// Patient receiving the equipment.
    pub patient_name: String,
    /// Patient contact number.
    pub patient_phone: String,
    /// Street address of the delivery.
    pub address: String,
    /// Geocoded delivery location.
    pub location: Coord<f64>,
    /// Windows the patient is available in.
    pub available_times: BTreeSet<TimeWindow>,
    /// Products to deliver, by identifier.
    pub product_ids: Vec<String>,
    /// Business priority.
    pub priority: OrderPriority,
    /// Latest acceptable delivery date.
    pub delivery_deadline: Option<NaiveDate>,
    /// Free-form notes for the driver.
    pub notes: Vec<String>,
}

impl Order {
    /// Construct an order with no products and no stated availability.
    pub fn new(id: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            patient_name: String::new(),
            patient_phone: String::new(),
            address: String::new(),
            location,
            available_times: BTreeSet::new(),
            product_ids: Vec::new(),
            priority: OrderPriority::default(),
            delivery_deadline: None,
            notes: Vec::new(),
        }
    }

    /// Append a product identifier.
    #[must_use]
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_ids.push(product_id.into());
        self
    }

    /// Add an availability window.
    #[must_use]
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.available_times.insert(window);
        self
    }

    /// Set the patient's name and address.
    #[must_use]
    pub fn with_patient(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.patient_name = name.into();
        self.address = address.into();
        self
    }
}
