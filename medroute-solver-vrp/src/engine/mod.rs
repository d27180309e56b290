//! `VrpRoutingEngine` implementation backed by `vrp-core`.

use std::time::Instant;

use medroute_core::{EngineFailure, EngineSolution, RoutingEngine, RoutingProblem, SearchBudget};

use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpRoutingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpEngineConfig {
    /// Upper bound on `vrp-core` generations when the budget sets none.
    pub max_generations: usize,
}

impl Default for VrpEngineConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
        }
    }
}

/// Routing engine using `vrp-core` metaheuristics.
///
/// The engine holds only configuration, so one instance can serve
/// concurrent independent runs.
///
/// # Examples
///
/// ```
/// use medroute_solver_vrp::{VrpEngineConfig, VrpRoutingEngine};
///
/// let engine = VrpRoutingEngine::with_config(VrpEngineConfig { max_generations: 50 });
/// assert_eq!(engine.config().max_generations, 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpRoutingEngine {
    config: VrpEngineConfig,
}

impl VrpRoutingEngine {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpEngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpEngineConfig {
        &self.config
    }
}

impl RoutingEngine for VrpRoutingEngine {
    fn solve(
        &self,
        problem: &RoutingProblem,
        budget: &SearchBudget,
    ) -> Result<EngineSolution, EngineFailure> {
        if problem.stops().is_empty() {
            return Ok(EngineSolution::default());
        }
        if problem.route_count() == 0 {
            return Err(EngineFailure::NoSolution);
        }

        let stranded: Vec<usize> = problem
            .stops()
            .iter()
            .filter(|stop| stop.allowed_routes.is_empty())
            .map(|stop| stop.node)
            .collect();
        if !stranded.is_empty() {
            log::debug!("stops {stranded:?} have no allowed route; skipping search");
            return Err(EngineFailure::Unassigned { stops: stranded });
        }

        let started_at = Instant::now();
        let outcome = VrpSolveContext::new(&self.config).solve(problem, budget);
        log::debug!(
            "vrp-core search over {} stop(s) and {} route(s) took {:?}",
            problem.stops().len(),
            problem.route_count(),
            started_at.elapsed()
        );
        outcome
    }
}
