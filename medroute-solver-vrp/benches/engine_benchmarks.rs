//! Criterion benchmarks for the vrp-core routing engine.
//!
//! Measures search time across delivery days of 10, 25 and 50 orders to
//! track performance and detect regressions.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package medroute-solver-vrp
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use medroute_core::{
    RoutingEngine, SchedulerSettings, SearchBudget, formulate, match_drivers_to_vehicles,
};
use medroute_solver_vrp::{VrpEngineConfig, VrpRoutingEngine};


use bench_support::{BENCHMARK_SEED, generate_delivery_day};

/// Problem sizes to benchmark as (drivers, orders).
const PROBLEM_SIZES: &[(usize, usize)] = &[(2, 10), (4, 25), (8, 50)];

/// Generation cap for each search.
const MAX_GENERATIONS: usize = 100;

/// Benchmark search times for the configured delivery-day sizes.
///
/// Inputs are generated and formulated outside the measured loop, so only
/// the engine's search is timed.
fn bench_search_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_time");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    let settings = SchedulerSettings::default();
    let engine = VrpRoutingEngine::with_config(VrpEngineConfig {
        max_generations: MAX_GENERATIONS,
    });
    let budget = SearchBudget {
        time_limit: Duration::from_secs(5),
        max_generations: Some(MAX_GENERATIONS),
    };

    for &(drivers, orders) in PROBLEM_SIZES {
        let input = generate_delivery_day(drivers, orders, BENCHMARK_SEED);
        let Ok(pairings) = match_drivers_to_vehicles(&input, settings.pairing) else {
            continue;
        };
        let Ok(problem) = formulate(&input, &pairings, &settings) else {
            continue;
        };

        group.throughput(Throughput::Elements(orders as u64));
        group.bench_with_input(
            BenchmarkId::new("orders", orders),
            &problem,
            |b, routing_problem| {
                b.iter(|| engine.solve(routing_problem, &budget));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_search_times);
criterion_main!(benches);
