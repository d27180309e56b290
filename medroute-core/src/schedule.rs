//! The output of a scheduling run.

use std::fmt;

use geo::Coord;

use crate::labels::label;
use crate::model::{Driver, Order, Vehicle};

/// Ordered deliveries for one driver-vehicle pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverSchedule {
    /// Driver of the route.
    pub driver: Driver,
    /// Vehicle of the route.
    pub vehicle: Vehicle,
    /// Orders in visiting order; empty when the route is unused.
    pub orders: Vec<Order>,
    /// Route start, always the depot.
    pub start_location: Coord<f64>,
    /// Route end, always the depot.
    pub end_location: Coord<f64>,
}

impl DriverSchedule {
    /// Whether the route has no deliveries.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl fmt::Display for DriverSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return write!(f, "{} has no deliveries.", self.driver.name);
        }
        writeln!(
            f,
            "{} (Vehicle {} - {}) has {} deliveries",
            self.driver.name,
            self.vehicle.id,
            label(self.vehicle.vehicle_type),
            self.orders.len()
        )?;
        for (index, order) in self.orders.iter().enumerate() {
            writeln!(
                f,
                "    {}) Order {} for patient {} with {} products at: {}",
                index + 1,
                order.id,
                order.patient_name,
                order.product_ids.len(),
                order.address
            )?;
        }
        Ok(())
    }
}

/// Result of a scheduling run.
///
/// A successful schedule covers every order that was part of the routing
/// problem; there are no partial schedules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Whether the engine found a feasible plan.
    pub successful: bool,
    /// One entry per route when successful, `None` otherwise.
    pub driver_schedules: Option<Vec<DriverSchedule>>,
    /// Orders left out because no route may serve them.
    pub skipped_orders: Vec<String>,
}

impl Schedule {
    /// A successful schedule.
    pub const fn feasible(
        driver_schedules: Vec<DriverSchedule>,
        skipped_orders: Vec<String>,
    ) -> Self {
        Self {
            successful: true,
            driver_schedules: Some(driver_schedules),
            skipped_orders,
        }
    }

    /// An infeasible run.
    pub const fn infeasible(skipped_orders: Vec<String>) -> Self {
        Self {
            successful: false,
            driver_schedules: None,
            skipped_orders,
        }
    }

    /// Driver schedules, empty when the run failed.
    pub fn routes(&self) -> &[DriverSchedule] {
        self.driver_schedules.as_deref().unwrap_or_default()
    }

    /// Every scheduled order id, route by route in visiting order.
    pub fn scheduled_order_ids(&self) -> impl Iterator<Item = &str> {
        self.routes()
            .iter()
            .flat_map(|route| route.orders.iter().map(|order| order.id.as_str()))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(routes) = self.driver_schedules.as_deref().filter(|_| self.successful) else {
            return write!(f, "Unable to create schedule");
        };
        for route in routes {
            writeln!(f, "{route}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleType;
    use rstest::{fixture, rstest};

    #[fixture]
    fn route() -> DriverSchedule {
        let depot = Coord { x: 0.0, y: 0.0 };
        DriverSchedule {
            driver: Driver::new("d1", "Ada Lovelace"),
            vehicle: Vehicle::new("v7", VehicleType::Truck),
            orders: Vec::new(),
            start_location: depot,
            end_location: depot,
        }
    }

    #[rstest]
    fn empty_route_says_so(route: DriverSchedule) {
        assert_eq!(route.to_string(), "Ada Lovelace has no deliveries.");
    }

    #[rstest]
    fn stops_are_numbered(mut route: DriverSchedule) {
        route.orders.push(
            Order::new("o1", Coord { x: 0.1, y: 0.1 })
                .with_patient("Grace", "1 Main St")
                .with_product("bed")
                .with_product("cane"),
        );
        let text = route.to_string();
        assert!(text.starts_with("Ada Lovelace (Vehicle v7 - Truck) has 1 deliveries\n"));
        assert!(text.contains("    1) Order o1 for patient Grace with 2 products at: 1 Main St"));
    }

    #[rstest]
    fn failed_schedule_renders_fixed_message() {
        let schedule = Schedule::infeasible(Vec::new());
        assert_eq!(schedule.to_string(), "Unable to create schedule");
        assert!(schedule.routes().is_empty());
    }

    #[rstest]
    fn scheduled_ids_follow_route_order(route: DriverSchedule) {
        let mut second = route.clone();
        second.orders.push(Order::new("b", Coord { x: 0.2, y: 0.0 }));
        let mut first = route;
        first.orders.push(Order::new("a", Coord { x: 0.1, y: 0.0 }));
        let schedule = Schedule::feasible(vec![first, second], Vec::new());
        assert_eq!(schedule.scheduled_order_ids().collect::<Vec<_>>(), ["a", "b"]);
    }
}
