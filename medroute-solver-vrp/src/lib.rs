//! Metaheuristic routing engine for medroute.
//!
//! This crate provides [`VrpRoutingEngine`], an implementation of the
//! [`RoutingEngine`](medroute_core::RoutingEngine) trait backed by the
//! `vrp-core` solver. Each formulated route becomes one vehicle with a
//! workday-long shift and each stop becomes a time-windowed job. Compatibility
//! and the day timeline are enforced as hard constraints, and the search
//! minimises unassigned stops, then opened routes, then arc cost.
//!
//! Every route the search returns is replayed through
//! [`RoutingProblem::evaluate_route`](medroute_core::RoutingProblem::evaluate_route)
//! before it is handed back, so callers only ever see feasible routes.
//!
//! # Examples
//!
//! ```no_run
//! use medroute_core::test_support::scenario_a;
//! use medroute_core::{Scheduler, SchedulerSettings};
//! use medroute_solver_vrp::VrpRoutingEngine;
//!
//! let scheduler = Scheduler::new(VrpRoutingEngine::new(), SchedulerSettings::default());
//! let schedule = scheduler.create_schedule(&scenario_a())?;
//! assert!(schedule.successful);
//! # Ok::<(), medroute_core::ScheduleError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod vrp;

pub use engine::{VrpEngineConfig, VrpRoutingEngine};
