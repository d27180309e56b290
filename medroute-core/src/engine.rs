//! Contract between the core and a combinatorial routing engine.
//!
//! The core formulates a [`RoutingProblem`]; an engine searches it within a
//! [`SearchBudget`] and either returns a node sequence for routes it uses or
//! reports failure. Search strategy is entirely the engine's business.

use thiserror::Error;

use crate::formulation::RoutingProblem;
use crate::settings::SearchBudget;

/// Stops visited by one route, in order, excluding the depot at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRoute {
    /// Route index into [`RoutingProblem::routes`].
    pub route: usize,
    /// Order-stop nodes in visiting order.
    pub nodes: Vec<usize>,
}

/// A feasible assignment of every stop to exactly one route.
///
/// Routes absent from `routes`, or present with no nodes, are unused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineSolution {
    /// Used routes.
    pub routes: Vec<EngineRoute>,
}

/// The engine could not produce a feasible solution.
///
/// This is an expected outcome, not a run error: the scheduler reports it as
/// an unsuccessful schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFailure {
    /// No feasible solution was found within the budget.
    #[error("no feasible solution found")]
    NoSolution,
    /// The best solution found leaves stops unassigned.
    #[error("stops {stops:?} could not be assigned to any route")]
    Unassigned {
        /// Nodes left over.
        stops: Vec<usize>,
    },
    /// The backing library failed.
    #[error("routing backend failed: {0}")]
    Backend(String),
}

/// A combinatorial optimiser for formulated problems.
///
/// Implementations must be safe for concurrent independent calls; a run
/// holds no state between calls.
///
/// # Examples
/// ```
/// use medroute_core::{EngineFailure, EngineSolution, RoutingEngine, RoutingProblem, SearchBudget};
///
/// struct Refuses;
///
/// impl RoutingEngine for Refuses {
///     fn solve(&self, _: &RoutingProblem, _: &SearchBudget) -> Result<EngineSolution, EngineFailure> {
///         Err(EngineFailure::NoSolution)
///     }
/// }
/// ```
pub trait RoutingEngine: Send + Sync {
    /// Search `problem` within `budget`.
    ///
    /// # Errors
    /// Returns an [`EngineFailure`] when no feasible solution is found.
    fn solve(
        &self,
        problem: &RoutingProblem,
        budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure>;
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for &E {
    fn solve(
        &self,
        problem: &RoutingProblem,
        budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        (**self).solve(problem, budget)
    }
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for Box<E> {
    fn solve(
        &self,
        problem: &RoutingProblem,
        budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        (**self).solve(problem, budget)
    }
}
