//! Property-based tests for the vrp-core routing engine.
//!
//! # Invariants tested
//!
//! - **Coverage:** a solution visits every stop exactly once.
//! - **Compatibility:** each stop sits on a route allowed to carry it.
//! - **Timeline:** every returned route replays without violation.
//! - **Failures:** unassigned stops name real order nodes.


use std::collections::HashSet;
use std::time::Duration;

use medroute_core::{
    EngineFailure, RoutingEngine, SchedulerSettings, SearchBudget, formulate,
    match_drivers_to_vehicles,
};
use medroute_solver_vrp::{VrpEngineConfig, VrpRoutingEngine};
use proptest::prelude::*;

use proptest_support::fleet_input_strategy;

fn engine() -> VrpRoutingEngine {
    VrpRoutingEngine::with_config(VrpEngineConfig { max_generations: 50 })
}

fn budget() -> SearchBudget {
    SearchBudget {
        time_limit: Duration::from_secs(1),
        max_generations: Some(50),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn engine_answers_are_feasible(
        input in fleet_input_strategy(5),
        max_wait_minutes in prop_oneof![Just(0_u32), Just(240_u32)],
    ) {
        let settings = SchedulerSettings {
            max_wait_minutes,
            ..SchedulerSettings::default()
        };
        let pairings = match_drivers_to_vehicles(&input, settings.pairing);
        prop_assert!(pairings.is_ok());
        let problem = formulate(&input, &pairings.unwrap_or_default(), &settings);
        prop_assert!(problem.is_ok());
        let Ok(problem) = problem else {
            return Ok(());
        };

        match engine().solve(&problem, &budget()) {
            Ok(solution) => {
                let mut seen = HashSet::new();
                for engine_route in &solution.routes {
                    for node in &engine_route.nodes {
                        prop_assert!(seen.insert(*node), "node {} visited twice", node);
                        let allowed = problem
                            .stop(*node)
                            .is_some_and(|stop| stop.allowed_routes.contains(&engine_route.route));
                        prop_assert!(allowed, "node {} not allowed on route {}", node, engine_route.route);
                    }
                    let replay = problem.evaluate_route(engine_route.route, &engine_route.nodes);
                    prop_assert!(replay.is_ok(), "route {} replays with {:?}", engine_route.route, replay);
                }
                prop_assert_eq!(seen.len(), problem.stops().len());
            }
            Err(EngineFailure::Unassigned { stops }) => {
                prop_assert!(!stops.is_empty());
                for node in stops {
                    prop_assert!(problem.stop(node).is_some());
                }
            }
            Err(EngineFailure::NoSolution) => prop_assert_eq!(problem.route_count(), 0),
            Err(EngineFailure::Backend(message)) => {
                prop_assert!(false, "backend failure: {}", message);
            }
        }
    }
}
