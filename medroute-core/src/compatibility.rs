//! Driver-vehicle pairing for a planning run.
//!
//! Every accepted pair becomes one route. The order of the returned pairs
//! fixes route indices `0..k`, so both strategies are deterministic in input
//! order.

use std::collections::{BTreeSet, HashSet};

use crate::error::MissingDataError;
use crate::model::{
    CertificationType, Driver, Order, ProductCatalog, SchedulingInputData, Vehicle, VehicleType,
};
use crate::settings::PairingStrategy;

/// What a route needs to be allowed to serve one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequirements {
    /// Certifications of every product in the order.
    pub certifications: BTreeSet<CertificationType>,
    /// Vehicle types acceptable to every product in the order.
    pub vehicle_types: BTreeSet<VehicleType>,
}

impl OrderRequirements {
    /// Derive requirements from an order's products.
    ///
    /// Acceptable vehicle types are the intersection across products; an
    /// order without products accepts every type.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use medroute_core::{CertificationType, Order, OrderRequirements, Product, VehicleType};
    /// use medroute_core::ProductCatalog;
    ///
    /// let products = vec![
    ///     Product::new("bed", "Bed", CertificationType::HospitalBeds).with_vehicle(VehicleType::Truck),
    ///     Product::new("cane", "Cane", CertificationType::Basic)
    ///         .with_vehicle(VehicleType::Truck)
    ///         .with_vehicle(VehicleType::Car),
    /// ];
    /// let order = Order::new("o1", Coord { x: 0.0, y: 0.0 }).with_product("bed").with_product("cane");
    /// let requirements = OrderRequirements::resolve(&order, &ProductCatalog::new(&products))?;
    /// assert_eq!(requirements.vehicle_types.len(), 1);
    /// assert_eq!(requirements.certifications.len(), 2);
    /// # Ok::<(), medroute_core::MissingDataError>(())
    /// ```
    pub fn resolve(order: &Order, catalog: &ProductCatalog<'_>) -> Result<Self, MissingDataError> {
        let products = catalog.products_for(order)?;
        let certifications = products.iter().map(|p| p.certification).collect();
        let vehicle_types = products.iter().fold(VehicleType::all(), |acc, product| {
            acc.intersection(&product.vehicle_types).copied().collect()
        });
        Ok(Self {
            certifications,
            vehicle_types,
        })
    }

    /// Resolve requirements for every order, in input order.
    ///
    /// # Errors
    /// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
    pub fn resolve_all(input: &SchedulingInputData) -> Result<Vec<Self>, MissingDataError> {
        let catalog = input.catalog();
        input
            .orders
            .iter()
            .map(|order| Self::resolve(order, &catalog))
            .collect()
    }

    /// Whether `driver` driving a `vehicle_type` may serve the order.
    pub fn accepts(&self, driver: &Driver, vehicle_type: VehicleType) -> bool {
        driver.holds_all(&self.certifications) && self.vehicle_types.contains(&vehicle_type)
    }
}

/// One accepted driver-vehicle pair; its position in the pairing list is its
/// route index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePairing<'a> {
    /// Vehicle driven on the route.
    pub vehicle: &'a Vehicle,
    /// Driver of the route.
    pub driver: &'a Driver,
}

/// Pair drivers with vehicles so that each pair can serve at least one order.
///
/// A pair is a candidate when the driver is licensed for the vehicle type and
/// holds at least one certification required anywhere in the order set. A
/// candidate is only accepted when some order's requirements are met by the
/// driver's certifications and the vehicle's type.
///
/// # Errors
/// Returns [`MissingDataError::UnknownProduct`] for dangling product ids.
pub fn match_drivers_to_vehicles(
    input: &SchedulingInputData,
    strategy: PairingStrategy,
) -> Result<Vec<RoutePairing<'_>>, MissingDataError> {
    let requirements = OrderRequirements::resolve_all(input)?;
    let required_certs: BTreeSet<CertificationType> = requirements
        .iter()
        .flat_map(|r| r.certifications.iter().copied())
        .collect();

    let candidates = input.drivers.iter().flat_map(|driver| {
        input
            .vehicles
            .iter()
            .filter(|vehicle| {
                driver.can_drive(vehicle.vehicle_type) && driver.holds_any(&required_certs)
            })
            .map(move |vehicle| RoutePairing { vehicle, driver })
    });
    let serves_any = |pair: &RoutePairing<'_>| {
        requirements
            .iter()
            .any(|r| r.accepts(pair.driver, pair.vehicle.vehicle_type))
    };

    let pairs = match strategy {
        PairingStrategy::FirstFit => first_fit(candidates, serves_any),
        PairingStrategy::MaximumMatching => {
            maximum_matching(input, candidates.filter(|pair| serves_any(pair)))
        }
    };

    for (route, pair) in pairs.iter().enumerate() {
        log::debug!(
            "route {route}: driver {} with vehicle {} ({:?})",
            pair.driver.id,
            pair.vehicle.id,
            pair.vehicle.vehicle_type
        );
    }
    Ok(pairs)
}

fn first_fit<'a>(
    candidates: impl Iterator<Item = RoutePairing<'a>>,
    serves_any: impl Fn(&RoutePairing<'a>) -> bool,
) -> Vec<RoutePairing<'a>> {
    let mut used_drivers = HashSet::new();
    let mut used_vehicles = HashSet::new();
    let mut pairs = Vec::new();
    for pair in candidates {
        if used_drivers.contains(pair.driver.id.as_str())
            || used_vehicles.contains(pair.vehicle.id.as_str())
        {
            continue;
        }
        if !serves_any(&pair) {
            continue;
        }
        used_drivers.insert(pair.driver.id.as_str());
        used_vehicles.insert(pair.vehicle.id.as_str());
        pairs.push(pair);
    }
    pairs
}

/// Maximum-cardinality bipartite matching (Kuhn's augmenting paths).
///
/// Drivers are processed in input order and try vehicles in input order, so
/// the result is deterministic. Pairs are returned in driver order.
fn maximum_matching<'a>(
    input: &'a SchedulingInputData,
    edges: impl Iterator<Item = RoutePairing<'a>>,
) -> Vec<RoutePairing<'a>> {
    let driver_index = |driver: &Driver| input.drivers.iter().position(|d| std::ptr::eq(d, driver));
    let vehicle_index =
        |vehicle: &Vehicle| input.vehicles.iter().position(|v| std::ptr::eq(v, vehicle));

    let mut adjacency = vec![Vec::new(); input.drivers.len()];
    for pair in edges {
        if let (Some(d), Some(v)) = (driver_index(pair.driver), vehicle_index(pair.vehicle)) {
            adjacency[d].push(v);
        }
    }

    let mut owner: Vec<Option<usize>> = vec![None; input.vehicles.len()];
    for driver in 0..adjacency.len() {
        let mut visited = vec![false; input.vehicles.len()];
        augment(driver, &adjacency, &mut owner, &mut visited);
    }

    let mut assigned: Vec<(usize, usize)> = owner
        .iter()
        .enumerate()
        .filter_map(|(vehicle, driver)| driver.map(|d| (d, vehicle)))
        .collect();
    assigned.sort_unstable();
    assigned
        .into_iter()
        .map(|(d, v)| RoutePairing {
            vehicle: &input.vehicles[v],
            driver: &input.drivers[d],
        })
        .collect()
}

fn augment(
    driver: usize,
    adjacency: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &vehicle in &adjacency[driver] {
        if visited[vehicle] {
            continue;
        }
        visited[vehicle] = true;
        let free = match owner[vehicle] {
            None => true,
            Some(current) => augment(current, adjacency, owner, visited),
        };
        if free {
            owner[vehicle] = Some(driver);
            return true;
        }
    }
    false
}
