//! Orchestration of one scheduling run.

use crate::compatibility::match_drivers_to_vehicles;
use crate::decode::decode;
use crate::engine::{EngineFailure, RoutingEngine};
use crate::error::ScheduleError;
use crate::formulation::formulate;
use crate::model::SchedulingInputData;
use crate::schedule::Schedule;
use crate::settings::{SchedulerSettings, SearchBudget};

/// Plans next-day routes with an injected [`RoutingEngine`].
///
/// A run pairs drivers with vehicles, formulates the routing problem, makes
/// one blocking engine call and decodes the result. Nothing is kept between
/// runs, so one scheduler may serve concurrent runs when its engine allows it.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use medroute_core::test_support::FirstFitEngine;
/// use medroute_core::{Office, SchedulerSettings, Scheduler, SchedulingInputData};
///
/// let scheduler = Scheduler::new(FirstFitEngine, SchedulerSettings::default());
/// let input = SchedulingInputData::new(Office::new("hq", Coord { x: 0.0, y: 0.0 }));
/// let schedule = scheduler.create_schedule(&input)?;
/// assert!(schedule.successful);
/// # Ok::<(), medroute_core::ScheduleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    engine: E,
    settings: SchedulerSettings,
}

impl<E: RoutingEngine> Scheduler<E> {
    /// Create a scheduler.
    pub const fn new(engine: E, settings: SchedulerSettings) -> Self {
        Self { engine, settings }
    }

    /// Settings applied to every run.
    pub const fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// The routing engine.
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Plan routes using the configured search budget.
    ///
    /// # Errors
    /// See [`Scheduler::create_schedule_with_budget`].
    pub fn create_schedule(&self, input: &SchedulingInputData) -> Result<Schedule, ScheduleError> {
        self.create_schedule_with_budget(input, &self.settings.search_budget)
    }

    /// Plan routes with an explicit engine budget.
    ///
    /// Infeasibility is reported as an unsuccessful [`Schedule`].
    ///
    /// # Errors
    /// Returns [`ScheduleError`] for invalid settings, dangling references
    /// in `input`, or engine output that breaks the engine contract.
    pub fn create_schedule_with_budget(
        &self,
        input: &SchedulingInputData,
        budget: &SearchBudget,
    ) -> Result<Schedule, ScheduleError> {
        log::info!(
            "scheduling {} orders with {} drivers and {} vehicles",
            input.orders.len(),
            input.drivers.len(),
            input.vehicles.len()
        );
        self.settings.validate()?;
        let pairings = match_drivers_to_vehicles(input, self.settings.pairing)?;
        if pairings.is_empty() {
            log::warn!("no driver-vehicle pair can serve any order");
        }
        let problem = formulate(input, &pairings, &self.settings)?;
        if !problem.skipped_orders().is_empty() {
            log::warn!(
                "skipping unreachable orders {:?}",
                problem.skipped_orders()
            );
        }

        let outcome = if problem.route_count() == 0 && !problem.stops().is_empty() {
            Err(EngineFailure::NoSolution)
        } else {
            log::debug!(
                "solving {} stops on {} routes within {:?}",
                problem.stops().len(),
                problem.route_count(),
                budget.time_limit
            );
            self.engine.solve(&problem, budget)
        };

        let schedule = decode(input, &problem, outcome)?;
        if schedule.successful {
            log::info!(
                "scheduled {} orders on {} of {} routes",
                schedule.scheduled_order_ids().count(),
                schedule.routes().iter().filter(|route| !route.is_empty()).count(),
                problem.route_count()
            );
        } else {
            log::info!("no feasible schedule found");
        }
        Ok(schedule)
    }
}
