//! Conversion of engine output into driver schedules.

use crate::engine::{EngineFailure, EngineSolution};
use crate::error::{MissingDataError, ScheduleError};
use crate::formulation::{RouteSlot, RouteTimeline, RoutingProblem};
use crate::model::{Driver, SchedulingInputData, Vehicle};
use crate::schedule::{DriverSchedule, Schedule};

/// Decode an engine outcome into a [`Schedule`].
///
/// A failure becomes an unsuccessful schedule with no routes. A solution is
/// replayed route by route against `problem`; every route index appears in
/// the result, unused routes with no orders.
///
/// # Errors
/// Returns [`ScheduleError::MalformedSolution`] when the solution names an
/// unknown route, breaks a hard constraint, visits a stop twice or misses
/// one, and [`ScheduleError::MissingData`] when a route's driver or vehicle
/// is absent from `input`.
pub fn decode(
    input: &SchedulingInputData,
    problem: &RoutingProblem,
    outcome: Result<EngineSolution, EngineFailure>,
) -> Result<Schedule, ScheduleError> {
    let solution = match outcome {
        Ok(solution) => solution,
        Err(failure) => {
            log::warn!("routing engine reported an infeasible run: {failure}");
            return Ok(Schedule::infeasible(problem.skipped_orders().to_vec()));
        }
    };

    let timelines = replay(problem, &solution)?;
    let depot = input.office.location;
    let driver_schedules = problem
        .routes()
        .iter()
        .zip(timelines)
        .map(|(slot, timeline)| -> Result<DriverSchedule, ScheduleError> {
            let (driver, vehicle) = resolve_pair(input, slot)?;
            let orders = timeline
                .visits
                .iter()
                .map(|visit| {
                    input.orders.get(visit.node - 1).cloned().ok_or_else(|| {
                        malformed(format!("node {} has no matching order", visit.node))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DriverSchedule {
                driver: driver.clone(),
                vehicle: vehicle.clone(),
                orders,
                start_location: depot,
                end_location: depot,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Schedule::feasible(
        driver_schedules,
        problem.skipped_orders().to_vec(),
    ))
}

/// Replay every route, checking route indices and stop coverage.
fn replay(
    problem: &RoutingProblem,
    solution: &EngineSolution,
) -> Result<Vec<RouteTimeline>, ScheduleError> {
    let mut assigned: Vec<Option<&[usize]>> = vec![None; problem.route_count()];
    for engine_route in &solution.routes {
        let slot = assigned
            .get_mut(engine_route.route)
            .ok_or_else(|| malformed(format!("unknown route {}", engine_route.route)))?;
        if slot.is_some() {
            return Err(malformed(format!(
                "route {} listed more than once",
                engine_route.route
            )));
        }
        *slot = Some(&engine_route.nodes);
    }

    let mut visited = vec![false; problem.location_count()];
    let mut timelines = Vec::with_capacity(assigned.len());
    for (route, nodes) in assigned.into_iter().enumerate() {
        let timeline = problem
            .evaluate_route(route, nodes.unwrap_or_default())
            .map_err(|violation| malformed(format!("route {route}: {violation}")))?;
        for visit in &timeline.visits {
            if std::mem::replace(&mut visited[visit.node], true) {
                return Err(malformed(format!("node {} visited twice", visit.node)));
            }
        }
        timelines.push(timeline);
    }

    let missing: Vec<usize> = problem
        .stops()
        .iter()
        .map(|stop| stop.node)
        .filter(|&node| !visited[node])
        .collect();
    if !missing.is_empty() {
        return Err(malformed(format!("stops {missing:?} were never visited")));
    }
    Ok(timelines)
}

fn resolve_pair<'a>(
    input: &'a SchedulingInputData,
    slot: &RouteSlot,
) -> Result<(&'a Driver, &'a Vehicle), MissingDataError> {
    let driver = input
        .drivers
        .iter()
        .find(|driver| driver.id == slot.driver_id)
        .ok_or_else(|| MissingDataError::UnknownDriver {
            driver_id: slot.driver_id.clone(),
        })?;
    let vehicle = input
        .vehicles
        .iter()
        .find(|vehicle| vehicle.id == slot.vehicle_id)
        .ok_or_else(|| MissingDataError::UnknownVehicle {
            vehicle_id: slot.vehicle_id.clone(),
        })?;
    Ok((driver, vehicle))
}

fn malformed(reason: String) -> ScheduleError {
    ScheduleError::MalformedSolution { reason }
}
