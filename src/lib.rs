//! Facade crate for the medroute delivery planner.
//!
//! This crate re-exports the core domain types and exposes the optional
//! `vrp-core` routing engine behind a feature flag.
//!
//! # Examples
//!
//! ```no_run
//! # #[cfg(feature = "solver-vrp")]
//! # {
//! use medroute::{Scheduler, SchedulerSettings, SchedulingInputData, VrpRoutingEngine};
//!
//! fn plan(input: &SchedulingInputData) -> Result<(), medroute::ScheduleError> {
//!     let scheduler = Scheduler::new(VrpRoutingEngine::new(), SchedulerSettings::default());
//!     let schedule = scheduler.create_schedule(input)?;
//!     let _report = schedule.to_string();
//!     Ok(())
//! }
//! # }
//! ```

#![forbid(unsafe_code)]

pub use medroute_core::{
    AvailabilityStatus, CertificationType, Day, Driver, DriverSchedule, EngineFailure,
    EngineRoute, EngineSolution, MissingDataError, Office, Order, OrderPriority,
    PairingStrategy, Product, RouteProjection, RoutingEngine, RoutingProblem, Schedule,
    ScheduleError, Scheduler, SchedulerSettings, SchedulingInputData, SearchBudget,
    SettingsError, TimeWindow, UnreachablePolicy, Vehicle, VehicleType, project_schedule,
};

#[cfg(feature = "solver-vrp")]
pub use medroute_solver_vrp::{VrpEngineConfig, VrpRoutingEngine};
