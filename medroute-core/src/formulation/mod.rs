//! Formulation of the routing problem handed to a [`RoutingEngine`].
//!
//! [`formulate`] is a pure builder: it reads the input snapshot, the route
//! pairings and the settings, and returns an immutable [`RoutingProblem`].
//! Node `0` is the depot and node `i + 1` is `orders[i]`; matrices cover every
//! node, including orders excluded by [`UnreachablePolicy::SkipOrder`].
//!
//! [`RoutingEngine`]: crate::RoutingEngine

mod evaluate;

use std::collections::BTreeSet;

pub use evaluate::{RouteTimeline, RouteViolation, Visit};

use crate::compatibility::{OrderRequirements, RoutePairing};
use crate::distance::{DistanceMatrix, travel_minutes, whole_minutes};
use crate::error::ScheduleError;
use crate::model::{Order, SchedulingInputData, TimeWindow, VehicleType};
use crate::settings::{SchedulerSettings, UnreachablePolicy};
use crate::setup_time::SetupTimeEstimator;

/// Node index of the depot.
pub const DEPOT: usize = 0;

/// One route of the problem, backed by an accepted driver-vehicle pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSlot {
    /// Driver identifier.
    pub driver_id: String,
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Vehicle type, for engines that model fleets by type.
    pub vehicle_type: VehicleType,
}

/// Inclusive range of minutes from the shared day start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteWindow {
    /// Earliest permitted arrival.
    pub earliest: u32,
    /// Latest permitted arrival.
    pub latest: u32,
}

impl MinuteWindow {
    /// Whether `minute` lies inside the window.
    pub const fn contains(&self, minute: u32) -> bool {
        self.earliest <= minute && minute <= self.latest
    }

    /// Window for a patient's availability set.
    ///
    /// Morning alone or afternoon alone map to that half of the day; any other
    /// combination, including an empty set, maps to the whole day.
    pub fn for_availability(
        available: &BTreeSet<TimeWindow>,
        settings: &SchedulerSettings,
    ) -> Self {
        let morning = available.contains(&TimeWindow::Morning);
        let afternoon = available.contains(&TimeWindow::Afternoon);
        match (morning, afternoon) {
            (true, false) => Self {
                earliest: settings.morning_start_minute,
                latest: settings.morning_end_minute,
            },
            (false, true) => Self {
                earliest: settings.afternoon_start_minute,
                latest: settings.afternoon_end_minute,
            },
            _ => Self {
                earliest: settings.morning_start_minute,
                latest: settings.afternoon_end_minute,
            },
        }
    }
}

/// An order stop the engine must visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Node index of the stop.
    pub node: usize,
    /// Order served at the stop.
    pub order_id: String,
    /// Route indices permitted to visit the stop.
    pub allowed_routes: BTreeSet<usize>,
    /// Arrival window.
    pub window: MinuteWindow,
    /// Estimated setup minutes, already included in inbound transit.
    pub setup_minutes: u32,
}

/// The cumulative time dimension shared by every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDimension {
    /// Cap on a route's cumulative minutes, including the return to depot.
    pub capacity: u32,
    /// Longest wait permitted at a stop before its window opens.
    pub max_wait: u32,
    /// Lower bound on the end time of a used route.
    pub min_route_end: u32,
}

/// The formulated problem: topology, costs, time dimension and stop
/// constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingProblem {
    location_count: usize,
    routes: Vec<RouteSlot>,
    stops: Vec<Stop>,
    node_stop: Vec<Option<usize>>,
    skipped_orders: Vec<String>,
    arc_costs: Vec<i64>,
    transit: Vec<u32>,
    time: TimeDimension,
    fixed_route_cost: u64,
}

impl RoutingProblem {
    /// Number of nodes, depot included.
    pub const fn location_count(&self) -> usize {
        self.location_count
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Depot node index.
    pub const fn depot(&self) -> usize {
        DEPOT
    }

    /// Routes in index order.
    pub fn routes(&self) -> &[RouteSlot] {
        &self.routes
    }

    /// Stops the engine must visit, in node order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The stop at `node`, if `node` is a visitable order stop.
    pub fn stop(&self, node: usize) -> Option<&Stop> {
        self.node_stop
            .get(node)
            .copied()
            .flatten()
            .and_then(|index| self.stops.get(index))
    }

    /// Orders left out of the problem because no route may serve them.
    pub fn skipped_orders(&self) -> &[String] {
        &self.skipped_orders
    }

    /// Integer travel cost of the arc `from -> to`; zero off the matrix.
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        self.index(from, to)
            .and_then(|i| self.arc_costs.get(i).copied())
            .unwrap_or(0)
    }

    /// Minutes consumed by the arc `from -> to`: drive time plus, when `to`
    /// is an order, its setup and break minutes. Zero off the matrix.
    pub fn transit_minutes(&self, from: usize, to: usize) -> u32 {
        self.index(from, to)
            .and_then(|i| self.transit.get(i).copied())
            .unwrap_or(0)
    }

    /// Time dimension parameters.
    pub const fn time(&self) -> &TimeDimension {
        &self.time
    }

    /// Cost charged once for every used route.
    pub const fn fixed_route_cost(&self) -> u64 {
        self.fixed_route_cost
    }

    fn index(&self, from: usize, to: usize) -> Option<usize> {
        (from < self.location_count && to < self.location_count)
            .then(|| from * self.location_count + to)
    }
}

/// Build the routing problem for one run.
///
/// # Errors
/// Returns [`ScheduleError::Settings`] for unusable settings and
/// [`ScheduleError::MissingData`] for dangling product references.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use medroute_core::{formulate, Office, Order, SchedulerSettings, SchedulingInputData};
///
/// let mut input = SchedulingInputData::new(Office::new("hq", Coord { x: 0.0, y: 0.0 }));
/// input.orders.push(Order::new("o1", Coord { x: 1.0, y: 0.0 }));
/// let problem = formulate(&input, &[], &SchedulerSettings::default())?;
/// assert_eq!(problem.location_count(), 2);
/// assert_eq!(problem.arc_cost(0, 1), 111);
/// // 167 minutes of driving plus the 15 minute setup floor.
/// assert_eq!(problem.transit_minutes(0, 1), 182);
/// assert!(problem.stops()[0].allowed_routes.is_empty());
/// # Ok::<(), medroute_core::ScheduleError>(())
/// ```
pub fn formulate(
    input: &SchedulingInputData,
    pairings: &[RoutePairing<'_>],
    settings: &SchedulerSettings,
) -> Result<RoutingProblem, ScheduleError> {
    settings.validate()?;
    let catalog = input.catalog();
    let estimator = SetupTimeEstimator::new(settings.setup.clone());

    let mut setup = vec![0_u32; input.orders.len() + 1];
    let mut stops = Vec::with_capacity(input.orders.len());
    let mut node_stop = vec![None; input.orders.len() + 1];
    let mut skipped_orders = Vec::new();

    for (index, order) in input.orders.iter().enumerate() {
        let node = index + 1;
        let requirements = OrderRequirements::resolve(order, &catalog)?;
        let setup_minutes = estimator.order_minutes(&catalog.products_for(order)?);
        setup[node] = setup_minutes;

        let allowed_routes = allowed_routes(&requirements, pairings);
        if allowed_routes.is_empty() {
            log::warn!("order {} cannot be served by any route", order.id);
            if settings.unreachable_orders == UnreachablePolicy::SkipOrder {
                skipped_orders.push(order.id.clone());
                continue;
            }
        }
        let stop = build_stop(order, node, allowed_routes, setup_minutes, settings);
        log::debug!(
            "stop {node} ({}): routes {:?}, window {}..={}, setup {} min",
            stop.order_id,
            stop.allowed_routes,
            stop.window.earliest,
            stop.window.latest,
            stop.setup_minutes
        );
        node_stop[node] = Some(stops.len());
        stops.push(stop);
    }

    let distances = DistanceMatrix::build(&input.locations());
    let (arc_costs, transit) = cost_matrices(&distances, &setup, settings);

    let routes = pairings
        .iter()
        .map(|pair| RouteSlot {
            driver_id: pair.driver.id.clone(),
            vehicle_id: pair.vehicle.id.clone(),
            vehicle_type: pair.vehicle.vehicle_type,
        })
        .collect();

    Ok(RoutingProblem {
        location_count: distances.len(),
        routes,
        stops,
        node_stop,
        skipped_orders,
        arc_costs,
        transit,
        time: TimeDimension {
            capacity: settings.minutes_per_workday,
            max_wait: settings.max_wait_minutes,
            min_route_end: settings.min_route_end_minutes,
        },
        fixed_route_cost: settings.fixed_route_cost,
    })
}

fn allowed_routes(
    requirements: &OrderRequirements,
    pairings: &[RoutePairing<'_>],
) -> BTreeSet<usize> {
    pairings
        .iter()
        .enumerate()
        .filter(|(_, pair)| requirements.accepts(pair.driver, pair.vehicle.vehicle_type))
        .map(|(route, _)| route)
        .collect()
}

fn build_stop(
    order: &Order,
    node: usize,
    allowed_routes: BTreeSet<usize>,
    setup_minutes: u32,
    settings: &SchedulerSettings,
) -> Stop {
    Stop {
        node,
        order_id: order.id.clone(),
        allowed_routes,
        window: MinuteWindow::for_availability(&order.available_times, settings),
        setup_minutes,
    }
}

fn cost_matrices(
    distances: &DistanceMatrix,
    setup: &[u32],
    settings: &SchedulerSettings,
) -> (Vec<i64>, Vec<u32>) {
    let n = distances.len();
    let mut arc_costs = Vec::with_capacity(n * n);
    let mut transit = Vec::with_capacity(n * n);
    for from in 0..n {
        for to in 0..n {
            let km = distances.get(from, to);
            arc_costs.push(leg_arc_cost(km, settings));
            let service = if to == DEPOT {
                0
            } else {
                setup[to].saturating_add(settings.break_minutes_between_stops)
            };
            transit.push(leg_transit(km, service, settings));
        }
    }
    (arc_costs, transit)
}

/// Integer arc cost of a `km` leg, ties rounded to even.
pub(crate) fn leg_arc_cost(km: f64, settings: &SchedulerSettings) -> i64 {
    (km * settings.distance_scale).round_ties_even() as i64
}

/// Minutes a `km` leg adds to the time dimension when `service` minutes are
/// spent at its destination.
pub(crate) fn leg_transit(km: f64, service: u32, settings: &SchedulerSettings) -> u32 {
    whole_minutes(travel_minutes(km, settings.driving_speed_kmh) + f64::from(service))
}
