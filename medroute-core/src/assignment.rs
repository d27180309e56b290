//! Who can carry what: per-order, per-vehicle and per-driver views of the
//! compatibility rules, for diagnosing infeasible inputs.

use crate::compatibility::OrderRequirements;
use crate::error::MissingDataError;
use crate::model::{Driver, Order, SchedulingInputData, Vehicle};

/// Drivers and vehicles able to serve one order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAssignment<'a> {
    /// The order.
    pub order: &'a Order,
    /// Drivers holding every certification the order needs.
    pub certified_drivers: Vec<&'a Driver>,
    /// Vehicles of a type every product in the order accepts.
    pub compatible_vehicles: Vec<&'a Vehicle>,
}

/// Orders one vehicle can carry and drivers allowed to drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleAssignment<'a> {
    /// The vehicle.
    pub vehicle: &'a Vehicle,
    /// Orders whose products all accept the vehicle's type.
    pub transportable_orders: Vec<&'a Order>,
    /// Drivers licensed for the vehicle's type.
    pub allowed_drivers: Vec<&'a Driver>,
}

/// Vehicles one driver may drive and orders they are certified for.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverAssignment<'a> {
    /// The driver.
    pub driver: &'a Driver,
    /// Vehicles of a type the driver is licensed for.
    pub allowed_vehicles: Vec<&'a Vehicle>,
    /// Orders whose certifications the driver holds.
    pub certified_orders: Vec<&'a Order>,
}

/// Per-order view, in input order.
///
/// # Errors
/// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
pub fn order_assignments(
    input: &SchedulingInputData,
) -> Result<Vec<OrderAssignment<'_>>, MissingDataError> {
    let requirements = OrderRequirements::resolve_all(input)?;
    Ok(input
        .orders
        .iter()
        .zip(&requirements)
        .map(|(order, needs)| OrderAssignment {
            order,
            certified_drivers: input
                .drivers
                .iter()
                .filter(|driver| driver.holds_all(&needs.certifications))
                .collect(),
            compatible_vehicles: input
                .vehicles
                .iter()
                .filter(|vehicle| needs.vehicle_types.contains(&vehicle.vehicle_type))
                .collect(),
        })
        .collect())
}

/// Per-vehicle view, in input order.
///
/// # Errors
/// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
pub fn vehicle_assignments(
    input: &SchedulingInputData,
) -> Result<Vec<VehicleAssignment<'_>>, MissingDataError> {
    let requirements = OrderRequirements::resolve_all(input)?;
    Ok(input
        .vehicles
        .iter()
        .map(|vehicle| VehicleAssignment {
            vehicle,
            transportable_orders: input
                .orders
                .iter()
                .zip(&requirements)
                .filter(|(_, needs)| needs.vehicle_types.contains(&vehicle.vehicle_type))
                .map(|(order, _)| order)
                .collect(),
            allowed_drivers: input
                .drivers
                .iter()
                .filter(|driver| driver.can_drive(vehicle.vehicle_type))
                .collect(),
        })
        .collect())
}

/// Per-driver view, in input order.
///
/// # Errors
/// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
pub fn driver_assignments(
    input: &SchedulingInputData,
) -> Result<Vec<DriverAssignment<'_>>, MissingDataError> {
    let requirements = OrderRequirements::resolve_all(input)?;
    Ok(input
        .drivers
        .iter()
        .map(|driver| DriverAssignment {
            driver,
            allowed_vehicles: input
                .vehicles
                .iter()
                .filter(|vehicle| driver.can_drive(vehicle.vehicle_type))
                .collect(),
            certified_orders: input
                .orders
                .iter()
                .zip(&requirements)
                .filter(|(_, needs)| driver.holds_all(&needs.certifications))
                .map(|(order, _)| order)
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scenario_b, scenario_c};
    use rstest::rstest;

    fn ids<'a, T>(items: &[&'a T], id: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
        items.iter().map(|&item| id(item)).collect()
    }

    #[rstest]
    fn split_order_has_no_compatible_vehicle() {
        let input = scenario_c();
        let orders = order_assignments(&input).expect("views");
        assert_eq!(orders[0].order.id, "order-split");
        assert_eq!(orders[0].certified_drivers.len(), 2);
        assert!(orders[0].compatible_vehicles.is_empty());
        assert_eq!(
            ids(&orders[1].compatible_vehicles, |v: &Vehicle| v.id.as_str()),
            ["truck-1", "car-1"]
        );
    }

    #[rstest]
    fn vehicles_list_transportable_orders() {
        let input = scenario_c();
        let vehicles = vehicle_assignments(&input).expect("views");
        assert_eq!(
            ids(&vehicles[0].transportable_orders, |o: &Order| o.id.as_str()),
            ["order-walker"]
        );
        assert_eq!(vehicles[0].allowed_drivers.len(), 2);
    }

    #[rstest]
    fn uncertified_driver_has_no_orders() {
        let input = scenario_b();
        let drivers = driver_assignments(&input).expect("views");
        assert!(drivers[0].certified_orders.is_empty());
        assert_eq!(
            ids(&drivers[0].allowed_vehicles, |v: &Vehicle| v.id.as_str()),
            ["truck-1"]
        );
    }
}
