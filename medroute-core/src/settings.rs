//! Tunables for a scheduling run.
//!
//! Defaults reproduce the production planning day: a 40 km/h average speed,
//! a morning window of minutes `0..=239`, an afternoon window of
//! `240..=480`, and a 479-minute cap on every route.

use std::time::Duration;

use chrono::NaiveTime;

use crate::error::SettingsError;

/// How drivers are paired with vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairingStrategy {
    /// Greedy first fit over drivers then vehicles in input order.
    #[default]
    FirstFit,
    /// Maximum-cardinality matching via augmenting paths.
    MaximumMatching,
}

/// What to do with orders no route is allowed to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnreachablePolicy {
    /// Keep the stop in the problem; the engine then reports the run as
    /// infeasible.
    #[default]
    FailRun,
    /// Leave the order out of the problem and report it as skipped.
    SkipOrder,
}

/// Wall-clock budget handed to the routing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBudget {
    /// Deadline for the search.
    pub time_limit: Duration,
    /// Optional cap on search iterations, for engines that count them.
    pub max_generations: Option<usize>,
}

impl SearchBudget {
    /// Budget bounded only by wall-clock time.
    pub const fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit,
            max_generations: None,
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::with_time_limit(Duration::from_secs(5))
    }
}

/// Parameters of the historical setup-time estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SetupTimeSettings {
    /// Floor applied to an order's total setup estimate.
    pub minimum_delivery_minutes: u32,
    /// Sample count from which outliers beyond two standard deviations are
    /// discarded.
    pub outlier_sample_threshold: usize,
    /// Multiple of the standard deviation added to the mean as a buffer.
    pub std_dev_multiple: f64,
}

impl Default for SetupTimeSettings {
    fn default() -> Self {
        Self {
            minimum_delivery_minutes: 15,
            outlier_sample_threshold: 5,
            std_dev_multiple: 0.4,
        }
    }
}

/// Settings for one scheduling run.
///
/// # Examples
/// ```
/// use medroute_core::SchedulerSettings;
///
/// let settings = SchedulerSettings::default();
/// assert_eq!(settings.minutes_per_workday, 479);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerSettings {
    /// Average driving speed.
    pub driving_speed_kmh: f64,
    /// Multiplier applied to kilometres before they become integer arc costs.
    pub distance_scale: f64,
    /// Cap on a route's cumulative drive and setup minutes.
    pub minutes_per_workday: u32,
    /// First minute of the morning window.
    pub morning_start_minute: u32,
    /// Last minute of the morning window.
    pub morning_end_minute: u32,
    /// First minute of the afternoon window.
    pub afternoon_start_minute: u32,
    /// Last minute of the afternoon window.
    pub afternoon_end_minute: u32,
    /// Extra minutes charged on every arc into an order stop.
    pub break_minutes_between_stops: u32,
    /// Longest permitted wait at a stop before its window opens.
    pub max_wait_minutes: u32,
    /// Lower bound on the end-of-day time of a used route.
    pub min_route_end_minutes: u32,
    /// Cost charged for every route that visits at least one stop.
    pub fixed_route_cost: u64,
    /// Setup-time estimation parameters.
    pub setup: SetupTimeSettings,
    /// Driver-vehicle pairing strategy.
    pub pairing: PairingStrategy,
    /// Handling of orders no route may visit.
    pub unreachable_orders: UnreachablePolicy,
    /// Budget passed to the routing engine.
    pub search_budget: SearchBudget,
    /// Clock time that minute zero maps to in projections.
    pub day_start: NaiveTime,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            driving_speed_kmh: 40.0,
            distance_scale: 1.0,
            minutes_per_workday: 479,
            morning_start_minute: 0,
            morning_end_minute: 239,
            afternoon_start_minute: 240,
            afternoon_end_minute: 480,
            break_minutes_between_stops: 0,
            max_wait_minutes: 0,
            min_route_end_minutes: 1,
            fixed_route_cost: 10_000,
            setup: SetupTimeSettings::default(),
            pairing: PairingStrategy::default(),
            unreachable_orders: UnreachablePolicy::default(),
            search_budget: SearchBudget::default(),
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl SchedulerSettings {
    /// Check the settings describe a usable day.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.driving_speed_kmh.is_finite() && self.driving_speed_kmh > 0.0) {
            return Err(SettingsError::NonPositiveSpeed {
                speed_kmh: self.driving_speed_kmh,
            });
        }
        if !(self.distance_scale.is_finite() && self.distance_scale > 0.0) {
            return Err(SettingsError::InvalidDistanceScale {
                scale: self.distance_scale,
            });
        }
        if self.morning_end_minute < self.morning_start_minute {
            return Err(SettingsError::InvertedWindow {
                window: "morning",
                start: self.morning_start_minute,
                end: self.morning_end_minute,
            });
        }
        if self.afternoon_end_minute < self.afternoon_start_minute {
            return Err(SettingsError::InvertedWindow {
                window: "afternoon",
                start: self.afternoon_start_minute,
                end: self.afternoon_end_minute,
            });
        }
        if self.minutes_per_workday == 0 {
            return Err(SettingsError::EmptyWorkday);
        }
        if self.search_budget.time_limit.is_zero() {
            return Err(SettingsError::ZeroTimeLimit);
        }
        Ok(())
    }
}
