//! Behavioural tests for `VrpRoutingEngine` driven through `Scheduler`.

use std::cell::RefCell;
use std::time::Duration;

use medroute_core::test_support::{near_office, order, scenario_a, scenario_c};
use medroute_core::{
    Order, Schedule, ScheduleError, Scheduler, SchedulerSettings, SchedulingInputData,
    SearchBudget, TimeWindow, project_schedule,
};
use medroute_solver_vrp::{VrpEngineConfig, VrpRoutingEngine};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug)]
struct VrpWorld {
    input: RefCell<SchedulingInputData>,
    settings: RefCell<SchedulerSettings>,
    outcome: RefCell<Option<Result<Schedule, ScheduleError>>>,
}

impl VrpWorld {
    fn new() -> Self {
        let settings = SchedulerSettings {
            search_budget: SearchBudget {
                time_limit: Duration::from_secs(2),
                max_generations: Some(100),
            },
            ..SchedulerSettings::default()
        };
        Self {
            input: RefCell::new(scenario_a()),
            settings: RefCell::new(settings),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn schedule(&self) -> Schedule {
        self.outcome
            .borrow()
            .clone()
            .expect("outcome should be recorded before assertions")
            .expect("scheduling run should not error")
    }
}

#[fixture]
fn world() -> VrpWorld {
    VrpWorld::new()
}

#[given("a truck driver certified for hospital beds with one bed order")]
fn given_scenario_a(world: &VrpWorld) {
    world.input.replace(scenario_a());
}

#[given("two all-round drivers sharing a truck and a car")]
fn given_fleet(world: &VrpWorld) {
    let mut input = scenario_c();
    input.orders.clear();
    world.input.replace(input);
}

#[given("a hospital bed order and an oxygen order")]
fn given_split_orders(world: &VrpWorld) {
    let mut input = world.input.borrow_mut();
    input
        .orders
        .push(order("order-bed", near_office(1, 1), &["bed"]));
    input
        .orders
        .push(order("order-oxygen", near_office(-1, 1), &["oxygen"]));
}

#[given("two walker orders")]
fn given_walker_orders(world: &VrpWorld) {
    let mut input = world.input.borrow_mut();
    input
        .orders
        .push(order("order-north", near_office(1, 0), &["walker"]));
    input
        .orders
        .push(order("order-south", near_office(-1, 0), &["walker"]));
}

#[given("a walker order only available in the afternoon")]
fn given_afternoon_order(world: &VrpWorld) {
    world.input.borrow_mut().orders.push(
        Order::new("order-late", near_office(1, 0))
            .with_product("walker")
            .with_time_window(TimeWindow::Afternoon),
    );
}

#[given("drivers may wait up to 240 minutes")]
fn given_waiting_allowance(world: &VrpWorld) {
    world.settings.borrow_mut().max_wait_minutes = 240;
}

#[when("the schedule is created with the vrp engine")]
fn when_schedule_created(world: &VrpWorld) {
    let engine = VrpRoutingEngine::with_config(VrpEngineConfig {
        max_generations: 100,
    });
    let scheduler = Scheduler::new(engine, world.settings.borrow().clone());
    let outcome = scheduler.create_schedule(&world.input.borrow());
    world.outcome.replace(Some(outcome));
}

#[then("the schedule is successful")]
fn then_successful(world: &VrpWorld) {
    assert!(world.schedule().successful);
}

#[then("the schedule is unsuccessful")]
fn then_unsuccessful(world: &VrpWorld) {
    let schedule = world.schedule();
    assert!(!schedule.successful);
    assert!(schedule.driver_schedules.is_none());
}

#[then("exactly {count} routes carry deliveries")]
fn then_route_count(world: &VrpWorld, count: usize) {
    let schedule = world.schedule();
    let used = schedule
        .routes()
        .iter()
        .filter(|route| !route.is_empty())
        .count();
    assert_eq!(used, count);
}

#[then("order {order_id} is delivered by {driver_id} in {vehicle_id}")]
fn then_order_on_route(world: &VrpWorld, order_id: String, driver_id: String, vehicle_id: String) {
    let schedule = world.schedule();
    let carrier = schedule
        .routes()
        .iter()
        .find(|route| route.orders.iter().any(|order| order.id == order_id))
        .map(|route| (route.driver.id.as_str(), route.vehicle.id.as_str()));
    assert_eq!(carrier, Some((driver_id.as_str(), vehicle_id.as_str())));
}

#[then("every projected stop finishes inside its delivery window")]
fn then_finishes_in_window(world: &VrpWorld) {
    let schedule = world.schedule();
    let projections = project_schedule(
        &schedule,
        &world.input.borrow(),
        &world.settings.borrow(),
    );
    assert!(projections.is_ok(), "projection should succeed");
    let stops: Vec<_> = projections
        .unwrap_or_default()
        .into_iter()
        .flat_map(|route| route.stops)
        .collect();
    assert!(!stops.is_empty());
    for stop in stops {
        assert!(
            stop.window.start <= stop.finish && stop.finish <= stop.window.end,
            "{} finishes at {} outside {}-{}",
            stop.order_id,
            stop.finish,
            stop.window.start,
            stop.window.end
        );
    }
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 0)]
fn certified_driver_carries_bed(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 1)]
fn vehicle_types_use_separate_routes(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 2)]
fn compatible_orders_share_route(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 3)]
fn afternoon_order_without_waiting(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_engine.feature", index = 4)]
fn projected_finishes_respect_windows(world: VrpWorld) {
    let _ = world;
}
