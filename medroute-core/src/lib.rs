//! Core planning logic for next-day medical equipment deliveries.
//!
//! A run takes an immutable [`SchedulingInputData`] snapshot, pairs drivers
//! with vehicles, formulates a [`RoutingProblem`] with time windows,
//! certification and vehicle-type restrictions, hands it to an injected
//! [`RoutingEngine`] and decodes the answer into a [`Schedule`].
//!
//! # Examples
//!
//! ```
//! use medroute_core::test_support::{FirstFitEngine, scenario_a};
//! use medroute_core::{Scheduler, SchedulerSettings};
//!
//! let scheduler = Scheduler::new(FirstFitEngine, SchedulerSettings::default());
//! let schedule = scheduler.create_schedule(&scenario_a())?;
//! assert!(schedule.successful);
//! assert_eq!(schedule.routes()[0].orders[0].id, "order-bed");
//! # Ok::<(), medroute_core::ScheduleError>(())
//! ```

pub mod assignment;
pub mod compatibility;
pub mod decode;
pub mod distance;
pub mod engine;
pub mod error;
pub mod formulation;
pub mod labels;
pub mod model;
pub mod projection;
pub mod schedule;
pub mod scheduler;
pub mod settings;
pub mod setup_time;
pub mod test_support;

pub use compatibility::{OrderRequirements, RoutePairing, match_drivers_to_vehicles};
pub use decode::decode;
pub use distance::DistanceMatrix;
pub use engine::{EngineFailure, EngineRoute, EngineSolution, RoutingEngine};
pub use error::{MissingDataError, ScheduleError, SettingsError};
pub use formulation::{
    DEPOT, MinuteWindow, RouteSlot, RouteTimeline, RouteViolation, RoutingProblem, Stop,
    TimeDimension, Visit, formulate,
};
pub use model::{
    AvailabilityStatus, CertificationType, Day, Driver, Office, OfficeContact, Order,
    OrderPriority, Product, ProductCatalog, SchedulingInputData, TimeWindow, Vehicle,
    VehicleCapacity, VehicleFeature, VehicleType,
};
pub use projection::{RouteProjection, RouteSummary, StopProjection, project_schedule};
pub use schedule::{DriverSchedule, Schedule};
pub use scheduler::Scheduler;
pub use settings::{
    PairingStrategy, SchedulerSettings, SearchBudget, SetupTimeSettings, UnreachablePolicy,
};
pub use setup_time::SetupTimeEstimator;
