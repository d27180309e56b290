//! Error types for a scheduling run.
//!
//! Infeasibility is not an error here: an engine that cannot satisfy the
//! constraints yields an unsuccessful [`Schedule`](crate::Schedule), not an
//! error.

use thiserror::Error;

/// Input referenced an entity that was never loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingDataError {
    /// An order lists a product id absent from the catalogue.
    #[error("order {order_id} references unknown product {product_id}")]
    UnknownProduct {
        /// Order holding the dangling reference.
        order_id: String,
        /// Product id that could not be resolved.
        product_id: String,
    },
    /// An order id is not part of the input snapshot.
    #[error("order {order_id} is not part of the input data")]
    UnknownOrder {
        /// Order id that could not be resolved.
        order_id: String,
    },
    /// A route refers to a driver id missing from the input.
    #[error("driver {driver_id} is not part of the input data")]
    UnknownDriver {
        /// Driver id that could not be resolved.
        driver_id: String,
    },
    /// A route refers to a vehicle id missing from the input.
    #[error("vehicle {vehicle_id} is not part of the input data")]
    UnknownVehicle {
        /// Vehicle id that could not be resolved.
        vehicle_id: String,
    },
}

/// Settings that cannot describe a working day.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Driving speed must be strictly positive.
    #[error("driving speed must be positive, got {speed_kmh} km/h")]
    NonPositiveSpeed {
        /// Offending speed.
        speed_kmh: f64,
    },
    /// Distance scale must be strictly positive and finite.
    #[error("distance scale must be positive and finite, got {scale}")]
    InvalidDistanceScale {
        /// Offending scale.
        scale: f64,
    },
    /// A time window ends before it starts.
    #[error("{window} window ends at minute {end} before it starts at minute {start}")]
    InvertedWindow {
        /// Which window is broken.
        window: &'static str,
        /// Window start minute.
        start: u32,
        /// Window end minute.
        end: u32,
    },
    /// The workday cap is zero.
    #[error("workday must be longer than zero minutes")]
    EmptyWorkday,
    /// The search budget allows no time at all.
    #[error("search time limit must be positive")]
    ZeroTimeLimit,
}

/// Fatal failure of a scheduling run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Input data was incomplete.
    #[error(transparent)]
    MissingData(#[from] MissingDataError),
    /// Settings were unusable.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The routing engine returned output that breaks its contract.
    #[error("routing engine returned a malformed solution: {reason}")]
    MalformedSolution {
        /// What was wrong with the output.
        reason: String,
    },
}
