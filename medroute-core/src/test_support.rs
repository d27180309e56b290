//! Fixtures and engine doubles used by unit, behaviour and doc tests.
//!
//! [`FirstFitEngine`] honours the [`RoutingEngine`] contract with a greedy
//! cheapest insertion, which is enough for small fixtures. It is not an
//! optimiser.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::engine::{EngineFailure, EngineRoute, EngineSolution, RoutingEngine};
use crate::formulation::{RoutingProblem, Stop};
use crate::model::{
    CertificationType, Driver, Office, Order, Product, SchedulingInputData, TimeWindow, Vehicle,
    VehicleType,
};
use crate::settings::SearchBudget;

/// Office location shared by the fixtures (central London).
pub const OFFICE: Coord<f64> = Coord {
    x: -0.1278,
    y: 51.5074,
};

/// A point `north` and `east` hundredths of a degree away from [`OFFICE`].
pub fn near_office(north: i32, east: i32) -> Coord<f64> {
    Coord {
        x: OFFICE.x + f64::from(east) / 100.0,
        y: OFFICE.y + f64::from(north) / 100.0,
    }
}

/// The fixture office.
pub fn office() -> Office {
    let mut office = Office::new("office-1", OFFICE);
    office.name = "Central depot".to_owned();
    office
}

/// Hospital bed: truck only, needs the hospital-beds certification.
pub fn hospital_bed() -> Product {
    Product::new("bed", "Hospital bed", CertificationType::HospitalBeds)
        .with_vehicle(VehicleType::Truck)
        .with_setup_samples([40, 45, 50])
}

/// Oxygen concentrator: car only, needs the respiratory certification.
pub fn oxygen_concentrator() -> Product {
    Product::new("oxygen", "Oxygen concentrator", CertificationType::Respiratory)
        .with_vehicle(VehicleType::Car)
        .with_setup_samples([20, 25])
}

/// Walker: fits any vehicle, needs the basic certification.
pub fn walker() -> Product {
    Product::new("walker", "Walker", CertificationType::Basic)
        .with_vehicle(VehicleType::Car)
        .with_vehicle(VehicleType::Truck)
        .with_setup_samples([10, 12, 14])
}

/// An order for `products` at `location`, available all day.
pub fn order(id: &str, location: Coord<f64>, products: &[&str]) -> Order {
    products
        .iter()
        .fold(
            Order::new(id, location).with_patient(format!("Patient {id}"), format!("{id} Road")),
            |order, product| order.with_product(*product),
        )
        .with_time_window(TimeWindow::Morning)
        .with_time_window(TimeWindow::Afternoon)
}

/// Input with the fixture office and catalogue but no people or orders.
pub fn empty_input() -> SchedulingInputData {
    let mut input = SchedulingInputData::new(office());
    input.products = vec![hospital_bed(), oxygen_concentrator(), walker()];
    input
}

/// One hospital-beds truck driver, one truck, one hospital-bed order.
pub fn scenario_a() -> SchedulingInputData {
    let mut input = empty_input();
    input.drivers.push(
        Driver::new("driver-1", "Ada")
            .with_certification(CertificationType::HospitalBeds)
            .with_vehicle(VehicleType::Truck),
    );
    input.vehicles.push(Vehicle::new("truck-1", VehicleType::Truck));
    input
        .orders
        .push(order("order-bed", near_office(2, 1), &["bed"]));
    input
}

/// As [`scenario_a`], but the driver only holds the basic certification.
pub fn scenario_b() -> SchedulingInputData {
    let mut input = scenario_a();
    input.drivers[0] = Driver::new("driver-1", "Ada")
        .with_certification(CertificationType::Basic)
        .with_vehicle(VehicleType::Truck);
    input
}

/// A fully certified fleet plus one order combining a truck-only and a
/// car-only product, and one ordinary walker order.
pub fn scenario_c() -> SchedulingInputData {
    let mut input = empty_input();
    let all_round = |id: &str, name: &str| {
        Driver::new(id, name)
            .with_certification(CertificationType::Basic)
            .with_certification(CertificationType::HospitalBeds)
            .with_certification(CertificationType::Respiratory)
            .with_vehicle(VehicleType::Car)
            .with_vehicle(VehicleType::Truck)
    };
    input.drivers.push(all_round("driver-1", "Ada"));
    input.drivers.push(all_round("driver-2", "Bo"));
    input.vehicles.push(Vehicle::new("truck-1", VehicleType::Truck));
    input.vehicles.push(Vehicle::new("car-1", VehicleType::Car));
    input
        .orders
        .push(order("order-split", near_office(1, 1), &["bed", "oxygen"]));
    input
        .orders
        .push(order("order-walker", near_office(-1, 2), &["walker"]));
    input
}

/// Greedy engine: stops in order of closing window, each inserted at the
/// cheapest feasible position of the first route that accepts it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstFitEngine;

impl RoutingEngine for FirstFitEngine {
    fn solve(
        &self,
        problem: &RoutingProblem,
        _budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        let mut tours: Vec<Vec<usize>> = vec![Vec::new(); problem.route_count()];
        let mut pending: Vec<&Stop> = problem.stops().iter().collect();
        pending.sort_by_key(|stop| (stop.window.latest, stop.node));

        let mut unassigned = Vec::new();
        for stop in pending {
            match cheapest_insertion(problem, &tours, stop) {
                Some((route, position)) => {
                    if let Some(tour) = tours.get_mut(route) {
                        tour.insert(position, stop.node);
                    }
                }
                None => unassigned.push(stop.node),
            }
        }
        if !unassigned.is_empty() {
            unassigned.sort_unstable();
            return Err(EngineFailure::Unassigned { stops: unassigned });
        }

        Ok(EngineSolution {
            routes: tours
                .into_iter()
                .enumerate()
                .filter(|(_, nodes)| !nodes.is_empty())
                .map(|(route, nodes)| EngineRoute { route, nodes })
                .collect(),
        })
    }
}

fn cheapest_insertion(
    problem: &RoutingProblem,
    tours: &[Vec<usize>],
    stop: &Stop,
) -> Option<(usize, usize)> {
    let opening_cost = i64::try_from(problem.fixed_route_cost()).unwrap_or(i64::MAX);
    let mut best: Option<(i64, usize, usize)> = None;
    for &route in &stop.allowed_routes {
        let Some(tour) = tours.get(route) else {
            continue;
        };
        let Ok(current) = problem.evaluate_route(route, tour) else {
            continue;
        };
        let opening = if tour.is_empty() { opening_cost } else { 0 };
        for position in 0..=tour.len() {
            let mut candidate = tour.clone();
            candidate.insert(position, stop.node);
            let Ok(timeline) = problem.evaluate_route(route, &candidate) else {
                continue;
            };
            let delta = (timeline.arc_cost - current.arc_cost).saturating_add(opening);
            if best.is_none_or(|(cost, _, _)| delta < cost) {
                best = Some((delta, route, position));
            }
        }
    }
    best.map(|(_, route, position)| (route, position))
}

/// Engine returning a pre-recorded outcome and counting calls.
#[derive(Debug)]
pub struct ScriptedEngine {
    outcome: Result<EngineSolution, EngineFailure>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    /// Always answer with `solution`.
    pub const fn succeeding(solution: EngineSolution) -> Self {
        Self {
            outcome: Ok(solution),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with `failure`.
    pub const fn failing(failure: EngineFailure) -> Self {
        Self {
            outcome: Err(failure),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `solve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoutingEngine for ScriptedEngine {
    fn solve(
        &self,
        _problem: &RoutingProblem,
        _budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
