//! `vrp-core` modelling helpers for `VrpRoutingEngine`.
//!
//! This module converts a formulated [`RoutingProblem`] into a `vrp-core`
//! problem, runs the solver and translates the resulting tours back into
//! engine routes. Setup and break minutes are already folded into the transit
//! matrix, so jobs carry no service duration of their own.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use medroute_core::{
    DEPOT, EngineFailure, EngineRoute, EngineSolution, RoutingProblem, SearchBudget,
};
use vrp_core::models::common::{Location, Profile, TimeWindow};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::engine::VrpEngineConfig;

custom_dimension!(VehicleRoute typeof usize);
custom_dimension!(JobNode typeof usize);
custom_dimension!(JobRoutes typeof HashSet<usize>);

/// Rejects routes whose pairing is not in the job's allowed set.
struct AllowedRoutesConstraint {
    code: ViolationCode,
}

impl FeatureConstraint for AllowedRoutesConstraint {
    fn evaluate(&self, move_ctx: &MoveContext<'_>) -> Option<ConstraintViolation> {
        match move_ctx {
            MoveContext::Route { route_ctx, job, .. } => {
                let slot = route_ctx.route().actor.vehicle.dimens.get_vehicle_route();
                match (slot, job.dimens().get_job_routes()) {
                    (Some(index), Some(allowed)) if allowed.contains(index) => None,
                    _ => ConstraintViolation::fail(self.code),
                }
            }
            MoveContext::Activity { .. } => None,
        }
    }
}

/// Replays tours on the day timeline.
///
/// The timeline starts at minute zero and only allows waiting up to the
/// problem's slack, which `vrp-core`'s own scheduling does not model. As a
/// constraint it guards every insertion. As an objective it counts routes
/// that a removal left infeasible, ranked above every other objective.
struct DayTimeline {
    problem: Arc<RoutingProblem>,
    code: ViolationCode,
}

impl DayTimeline {
    fn breaches(&self, route: &VrpRoute) -> bool {
        let nodes = tour_nodes(route);
        !nodes.is_empty()
            && route
                .actor
                .vehicle
                .dimens
                .get_vehicle_route()
                .is_none_or(|&slot| self.problem.evaluate_route(slot, &nodes).is_err())
    }
}

impl FeatureConstraint for DayTimeline {
    fn evaluate(&self, move_ctx: &MoveContext<'_>) -> Option<ConstraintViolation> {
        match move_ctx {
            MoveContext::Route { .. } => None,
            MoveContext::Activity {
                route_ctx,
                activity_ctx,
                ..
            } => {
                let route = route_ctx.route();
                let Some(&slot) = route.actor.vehicle.dimens.get_vehicle_route() else {
                    return ConstraintViolation::skip(self.code);
                };
                let mut nodes = Vec::with_capacity(route.tour.job_count() + 1);
                let mut inserted = false;
                for activity in route.tour.all_activities() {
                    if activity.job.is_some() {
                        nodes.push(activity.place.location);
                    }
                    if std::ptr::eq(activity, activity_ctx.prev) {
                        nodes.push(activity_ctx.target.place.location);
                        inserted = true;
                    }
                }
                if !inserted {
                    return ConstraintViolation::skip(self.code);
                }
                self.problem
                    .evaluate_route(slot, &nodes)
                    .err()
                    .and_then(|_| ConstraintViolation::skip(self.code))
            }
        }
    }
}

impl FeatureObjective for DayTimeline {
    fn fitness(&self, solution: &InsertionContext) -> Cost {
        solution
            .solution
            .routes
            .iter()
            .filter(|route_ctx| self.breaches(route_ctx.route()))
            .map(|_| 1.0)
            .sum()
    }

    fn estimate(&self, _move_ctx: &MoveContext<'_>) -> Cost {
        0.0
    }
}

/// Job locations of a tour in visiting order, depot excluded.
fn tour_nodes(route: &VrpRoute) -> Vec<usize> {
    route
        .tour
        .all_activities()
        .filter(|activity| activity.job.is_some())
        .map(|activity| activity.place.location)
        .collect()
}

/// Charges the fixed cost once for every route that serves a job.
struct FixedRouteCostObjective {
    cost: Cost,
}

impl FeatureObjective for FixedRouteCostObjective {
    fn fitness(&self, solution: &InsertionContext) -> Cost {
        solution
            .solution
            .routes
            .iter()
            .filter(|route_ctx| route_ctx.route().tour.job_count() > 0)
            .map(|_| self.cost)
            .sum()
    }

    fn estimate(&self, move_ctx: &MoveContext<'_>) -> Cost {
        match move_ctx {
            MoveContext::Route { route_ctx, .. } if route_ctx.route().tour.job_count() == 0 => {
                self.cost
            }
            MoveContext::Route { .. } | MoveContext::Activity { .. } => 0.0,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "fixed route costs stay far below 2^52"
)]
const fn fixed_cost(problem: &RoutingProblem) -> Cost {
    problem.fixed_route_cost() as Cost
}

fn define_goal(
    problem: &Arc<RoutingProblem>,
    transport: Arc<dyn TransportCost>,
) -> GenericResult<GoalContext> {
    let min_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;

    let allowed_routes = FeatureBuilder::default()
        .with_name("allowed-routes")
        .with_constraint(AllowedRoutesConstraint {
            code: ViolationCode::default(),
        })
        .build()?;

    let day_timeline = FeatureBuilder::default()
        .with_name("day-timeline")
        .with_constraint(DayTimeline {
            problem: Arc::clone(problem),
            code: ViolationCode::default(),
        })
        .with_objective(DayTimeline {
            problem: Arc::clone(problem),
            code: ViolationCode::default(),
        })
        .build()?;

    let route_cost = FeatureBuilder::default()
        .with_name("fixed-route-cost")
        .with_objective(FixedRouteCostObjective {
            cost: fixed_cost(problem),
        })
        .build()?;

    let transport_feature = TransportFeatureBuilder::new("min-arc-cost")
        .set_transport_cost(transport)
        .set_time_constrained(true)
        .build_minimize_distance()?;

    // Objectives rank in feature order.
    GoalContextBuilder::with_features(&[
        day_timeline,
        min_unassigned,
        allowed_routes,
        route_cost,
        transport_feature,
    ])?
    .build()
}

fn define_problem(
    problem: &RoutingProblem,
    goal: GoalContext,
    transport: Arc<dyn TransportCost>,
) -> GenericResult<Problem> {
    let jobs = problem
        .stops()
        .iter()
        .map(|stop| {
            SingleBuilder::default()
                .id(format!("stop{}", stop.node).as_str())
                .dimension(|dimens| {
                    dimens.set_job_node(stop.node);
                    dimens.set_job_routes(stop.allowed_routes.iter().copied().collect());
                })
                .location(stop.node)?
                .times(vec![TimeWindow::new(
                    f64::from(stop.window.earliest),
                    f64::from(stop.window.latest),
                )])?
                .duration(0.0)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let shift_end = f64::from(problem.time().capacity);
    let vehicles = problem
        .routes()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            VehicleBuilder::default()
                .id(format!("route{index}-{}-{}", slot.driver_id, slot.vehicle_id).as_str())
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(DEPOT)
                        .set_start_time(0.0)
                        .set_end_location(DEPOT)
                        .set_end_time(shift_end)
                        .build()?,
                )
                .dimension(|dimens| {
                    dimens.set_vehicle_route(index);
                })
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Flattened copies of the arc-cost and transit matrices.
struct MatrixTransportCost {
    size: usize,
    distances: Vec<f64>,
    durations: Vec<f64>,
}

impl MatrixTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "scaled arc costs stay far below 2^52"
    )]
    fn new(problem: &RoutingProblem) -> Self {
        let size = problem.location_count();
        let mut distances = Vec::with_capacity(size * size);
        let mut durations = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                distances.push(problem.arc_cost(from, to) as f64);
                durations.push(f64::from(problem.transit_minutes(from, to)));
            }
        }
        Self {
            size,
            distances,
            durations,
        }
    }

    fn lookup(&self, matrix: &[f64], from: Location, to: Location) -> f64 {
        let result = (from < self.size && to < self.size)
            .then(|| from * self.size + to)
            .and_then(|index| matrix.get(index))
            .copied();
        debug_assert!(
            result.is_some(),
            "Matrix lookup failed: from={from}, to={to}"
        );
        result.unwrap_or(0.0)
    }
}

impl TransportCost for MatrixTransportCost {
    // The trait passes `route` and `departure` for time-dependent costs; the
    // formulated matrices do not vary by route or time of day.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.lookup(&self.distances, from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.lookup(&self.durations, from, to)
    }

    fn distance_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.lookup(&self.distances, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.lookup(&self.durations, from, to)
    }
}

fn backend(error: impl Display) -> EngineFailure {
    EngineFailure::Backend(error.to_string())
}

/// Runs a `vrp-core` search over a problem with at least one stop and route.
pub(crate) struct VrpSolveContext<'a> {
    config: &'a VrpEngineConfig,
}

impl<'a> VrpSolveContext<'a> {
    pub(crate) const fn new(config: &'a VrpEngineConfig) -> Self {
        Self { config }
    }

    pub(crate) fn solve(
        &self,
        problem: &RoutingProblem,
        budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        let shared = Arc::new(problem.clone());
        let transport = Arc::new(MatrixTransportCost::new(problem));
        let goal = define_goal(&shared, transport.clone()).map_err(backend)?;
        let vrp_problem = Arc::new(define_problem(problem, goal, transport).map_err(backend)?);

        let max_seconds = usize::try_from(budget.time_limit.as_secs().max(1)).unwrap_or(usize::MAX);
        let generations = budget
            .max_generations
            .unwrap_or(self.config.max_generations);
        let vrp_config = VrpConfigBuilder::new(vrp_problem.clone())
            .prebuild()
            .map_err(backend)?
            .with_max_time(Some(max_seconds))
            .with_max_generations(Some(generations))
            .build()
            .map_err(backend)?;

        let solution = vrp_core::solver::Solver::new(vrp_problem, vrp_config)
            .solve()
            .map_err(backend)?;

        extract_routes(problem, &solution)
    }
}

/// Translate a `vrp-core` solution, re-checking every tour against the
/// formulated constraints.
fn extract_routes(
    problem: &RoutingProblem,
    solution: &Solution,
) -> Result<EngineSolution, EngineFailure> {
    if !solution.unassigned.is_empty() {
        let mut stops: Vec<usize> = solution
            .unassigned
            .iter()
            .filter_map(|(job, _)| job.dimens().get_job_node().copied())
            .collect();
        stops.sort_unstable();
        log::debug!("vrp-core left {} stop(s) unassigned", stops.len());
        return Err(EngineFailure::Unassigned { stops });
    }

    let mut routes = Vec::with_capacity(solution.routes.len());
    for tour_route in &solution.routes {
        let Some(&route) = tour_route.actor.vehicle.dimens.get_vehicle_route() else {
            return Err(EngineFailure::Backend(
                "vehicle is missing its route index".to_owned(),
            ));
        };
        let nodes = tour_nodes(tour_route);
        if nodes.is_empty() {
            continue;
        }
        if let Err(violation) = problem.evaluate_route(route, &nodes) {
            log::warn!("vrp-core returned an infeasible tour for route {route}: {violation}");
            return Err(EngineFailure::Backend(format!(
                "route {route} breaks a hard constraint: {violation}"
            )));
        }
        routes.push(EngineRoute { route, nodes });
    }
    routes.sort_by_key(|engine_route| engine_route.route);
    Ok(EngineSolution { routes })
}

#[cfg(test)]
mod tests {
    use medroute_core::test_support::{near_office, order, scenario_a};
    use medroute_core::{
        PairingStrategy, SchedulerSettings, SchedulingInputData, formulate,
        match_drivers_to_vehicles,
    };
    use rstest::rstest;
    use vrp_core::models::common::Dimensions;

    use super::*;

    fn formulated(input: &SchedulingInputData) -> RoutingProblem {
        let pairings = match_drivers_to_vehicles(input, PairingStrategy::FirstFit)
            .expect("fixture products are known");
        formulate(input, &pairings, &SchedulerSettings::default())
            .expect("fixture settings are valid")
    }

    #[rstest]
    fn job_dimensions_hold_node_and_allowed_routes() {
        let mut dimens = Dimensions::default();
        dimens.set_job_node(3);
        dimens.set_job_routes(HashSet::from([0, 2]));
        assert_eq!(dimens.get_job_node(), Some(&3));
        assert_eq!(dimens.get_job_routes(), Some(&HashSet::from([0, 2])));
        assert_eq!(dimens.get_vehicle_route(), None);
    }

    #[rstest]
    fn vehicles_are_tagged_with_their_route_slot() {
        let mut input = scenario_a();
        input
            .orders
            .push(order("order-bed-2", near_office(-2, 1), &["bed"]));
        let problem = formulated(&input);
        let shared = Arc::new(problem.clone());
        let transport = Arc::new(MatrixTransportCost::new(&problem));
        let goal = define_goal(&shared, transport.clone()).expect("goal builds");
        let vrp_problem = define_problem(&problem, goal, transport).expect("problem builds");

        let slots: Vec<Option<usize>> = vrp_problem
            .fleet
            .vehicles
            .iter()
            .map(|vehicle| vehicle.dimens.get_vehicle_route().copied())
            .collect();
        assert_eq!(slots, vec![Some(0)]);
        assert_eq!(vrp_problem.jobs.size(), 2);
    }

    #[rstest]
    #[expect(clippy::float_cmp, reason = "10000 is exact in f64")]
    fn fixed_cost_mirrors_the_problem() {
        let problem = formulated(&scenario_a());
        assert_eq!(fixed_cost(&problem), 10_000.0);
    }
}
