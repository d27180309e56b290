//! Clock-time projection of a schedule for presentation layers.
//!
//! Minute zero maps to [`SchedulerSettings::day_start`]. The clock advances
//! leg by leg with the same rounded transit minutes the solver's time
//! dimension uses, waiting whenever a window has not opened yet, so every
//! projected finish and the return to base match the route's replayed
//! timeline. Per-leg drive minutes are `round(km * 60 / speed)`.

use chrono::{NaiveTime, TimeDelta};
use geo::Coord;

use crate::distance::{haversine_km, travel_minutes, whole_minutes};
use crate::error::MissingDataError;
use crate::formulation::{MinuteWindow, leg_transit};
use crate::model::{Order, ProductCatalog, SchedulingInputData, TimeWindow, VehicleType};
use crate::schedule::{DriverSchedule, Schedule};
use crate::settings::SchedulerSettings;
use crate::setup_time::SetupTimeEstimator;

/// Miles per kilometre.
pub const MILES_PER_KM: f64 = 0.621_371;

/// Clock range in which the patient accepts a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryWindow {
    /// Window opens.
    pub start: NaiveTime,
    /// Window closes.
    pub end: NaiveTime,
}

/// Setup estimate for one line item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductSetup {
    /// Product identifier.
    pub product_id: String,
    /// Product name.
    pub name: String,
    /// Setup minutes for this product alone.
    pub setup_minutes: u32,
}

/// One projected delivery.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopProjection {
    /// Order identifier.
    pub order_id: String,
    /// Patient name.
    pub patient_name: String,
    /// Patient phone number.
    pub patient_phone: String,
    /// Delivery address.
    pub address: String,
    /// Delivery coordinates.
    pub location: Coord<f64>,
    /// Kilometres driven from the previous stop.
    pub drive_km: f64,
    /// Miles driven from the previous stop.
    pub drive_miles: f64,
    /// Minutes driven from the previous stop.
    pub drive_minutes: u32,
    /// Setup estimate for the whole order.
    pub setup_minutes: u32,
    /// Line items with individual setup estimates.
    pub products: Vec<ProductSetup>,
    /// Patient's delivery window.
    pub window: DeliveryWindow,
    /// Minutes spent waiting for the window to open before arrival.
    pub waited_minutes: u32,
    /// Expected arrival.
    pub arrival: NaiveTime,
    /// Expected end of setup.
    pub finish: NaiveTime,
    /// Free-form notes from the order.
    pub notes: Vec<String>,
}

/// Totals for a projected route.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Miles driven depot to depot, to one decimal place.
    pub distance_miles: f64,
    /// Minutes driven depot to depot.
    pub drive_minutes: u32,
    /// Setup minutes across all stops.
    pub setup_minutes: u32,
    /// Expected return to the depot.
    pub return_to_base: NaiveTime,
    /// Number of stops.
    pub total_stops: usize,
}

/// A driver schedule with clock times and distances filled in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteProjection {
    /// Driver identifier.
    pub driver_id: String,
    /// Driver name.
    pub driver_name: String,
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Vehicle type.
    pub vehicle_type: VehicleType,
    /// Depot location.
    pub depot: Coord<f64>,
    /// Deliveries in visiting order.
    pub stops: Vec<StopProjection>,
    /// Route totals.
    pub summary: RouteSummary,
}

/// Project every route of a successful schedule; a failed schedule projects
/// to nothing.
///
/// # Errors
/// Returns [`MissingDataError::UnknownProduct`] when an order references a
/// product missing from `input`.
pub fn project_schedule(
    schedule: &Schedule,
    input: &SchedulingInputData,
    settings: &SchedulerSettings,
) -> Result<Vec<RouteProjection>, MissingDataError> {
    if !schedule.successful {
        return Ok(Vec::new());
    }
    let catalog = input.catalog();
    let estimator = SetupTimeEstimator::new(settings.setup.clone());
    schedule
        .routes()
        .iter()
        .map(|route| project_route(route, &catalog, &estimator, settings))
        .collect()
}

fn project_route(
    route: &DriverSchedule,
    catalog: &ProductCatalog<'_>,
    estimator: &SetupTimeEstimator,
    settings: &SchedulerSettings,
) -> Result<RouteProjection, MissingDataError> {
    // Minutes since day start, advanced exactly as the time dimension is.
    let mut elapsed = 0_u32;
    let mut at = route.start_location;
    let mut miles = 0.0;
    let mut drive_total = 0_u32;
    let mut setup_total = 0_u32;
    let mut stops = Vec::with_capacity(route.orders.len());

    for order in &route.orders {
        let drive_km = haversine_km(at, order.location);
        let drive_minutes = whole_minutes(travel_minutes(drive_km, settings.driving_speed_kmh));
        let setup_minutes = estimator.order_minutes(&catalog.products_for(order)?);
        let products = catalog
            .line_items(order)?
            .into_iter()
            .map(|product| ProductSetup {
                product_id: product.id.clone(),
                name: product.name.clone(),
                setup_minutes: estimator.product_minutes(product),
            })
            .collect();

        let service = setup_minutes.saturating_add(settings.break_minutes_between_stops);
        let ready = elapsed.saturating_add(leg_transit(drive_km, service, settings));
        let opens = MinuteWindow::for_availability(&order.available_times, settings).earliest;
        let waited_minutes = opens.saturating_sub(ready);
        elapsed = ready.saturating_add(waited_minutes);
        let finish = elapsed.saturating_sub(settings.break_minutes_between_stops);
        let arrival = finish.saturating_sub(setup_minutes);

        stops.push(StopProjection {
            order_id: order.id.clone(),
            patient_name: order.patient_name.clone(),
            patient_phone: order.patient_phone.clone(),
            address: order.address.clone(),
            location: order.location,
            drive_km,
            drive_miles: drive_km * MILES_PER_KM,
            drive_minutes,
            setup_minutes,
            products,
            window: delivery_window(order, settings),
            waited_minutes,
            arrival: advance(settings.day_start, arrival),
            finish: advance(settings.day_start, finish),
            notes: order.notes.clone(),
        });

        miles += drive_km * MILES_PER_KM;
        drive_total = drive_total.saturating_add(drive_minutes);
        setup_total = setup_total.saturating_add(setup_minutes);
        at = order.location;
    }

    if !stops.is_empty() {
        let home_km = haversine_km(at, route.end_location);
        miles += home_km * MILES_PER_KM;
        drive_total = drive_total.saturating_add(whole_minutes(travel_minutes(
            home_km,
            settings.driving_speed_kmh,
        )));
        elapsed = elapsed.saturating_add(leg_transit(home_km, 0, settings));
    }

    Ok(RouteProjection {
        driver_id: route.driver.id.clone(),
        driver_name: route.driver.name.clone(),
        vehicle_id: route.vehicle.id.clone(),
        vehicle_type: route.vehicle.vehicle_type,
        depot: route.start_location,
        summary: RouteSummary {
            distance_miles: (miles * 10.0).round_ties_even() / 10.0,
            drive_minutes: drive_total,
            setup_minutes: setup_total,
            return_to_base: advance(settings.day_start, elapsed),
            total_stops: stops.len(),
        },
        stops,
    })
}

/// The patient's window in clock time.
///
/// A morning-only window is shown closing when the afternoon opens, although
/// the solver requires service to end a minute earlier.
pub fn delivery_window(order: &Order, settings: &SchedulerSettings) -> DeliveryWindow {
    let window = MinuteWindow::for_availability(&order.available_times, settings);
    let morning_only = order.available_times.contains(&TimeWindow::Morning)
        && !order.available_times.contains(&TimeWindow::Afternoon);
    let end = if morning_only {
        settings.afternoon_start_minute
    } else {
        window.latest
    };
    DeliveryWindow {
        start: advance(settings.day_start, window.earliest),
        end: advance(settings.day_start, end),
    }
}

fn advance(time: NaiveTime, minutes: u32) -> NaiveTime {
    time + TimeDelta::minutes(i64::from(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::match_drivers_to_vehicles;
    use crate::formulation::{RouteTimeline, formulate};
    use crate::settings::PairingStrategy;
    use crate::test_support::{near_office, order, scenario_a};
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> SchedulerSettings {
        SchedulerSettings::default()
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    /// One route carrying every order of `input` in input order.
    fn single_route(input: &SchedulingInputData) -> Schedule {
        let route = DriverSchedule {
            driver: input.drivers[0].clone(),
            vehicle: input.vehicles[0].clone(),
            orders: input.orders.clone(),
            start_location: input.office.location,
            end_location: input.office.location,
        };
        Schedule::feasible(vec![route], Vec::new())
    }

    /// Replay of the same route on the formulated problem.
    fn timeline(input: &SchedulingInputData, settings: &SchedulerSettings) -> RouteTimeline {
        let pairings =
            match_drivers_to_vehicles(input, PairingStrategy::FirstFit).expect("pairings");
        let problem = formulate(input, &pairings, settings).expect("problem");
        let nodes: Vec<usize> = (1..=input.orders.len()).collect();
        problem.evaluate_route(0, &nodes).expect("feasible route")
    }

    fn assert_matches_timeline(
        projection: &RouteProjection,
        timeline: &RouteTimeline,
        settings: &SchedulerSettings,
    ) {
        assert_eq!(projection.stops.len(), timeline.visits.len());
        for (stop, visit) in projection.stops.iter().zip(&timeline.visits) {
            let served = visit.minute - settings.break_minutes_between_stops;
            assert_eq!(stop.finish, advance(settings.day_start, served));
            assert_eq!(stop.waited_minutes, visit.waited);
        }
        assert_eq!(
            projection.summary.return_to_base,
            advance(settings.day_start, timeline.end_minute)
        );
    }

    #[rstest]
    #[case(&[TimeWindow::Morning], (9, 0), (13, 0))]
    #[case(&[TimeWindow::Afternoon], (13, 0), (17, 0))]
    #[case(&[TimeWindow::Morning, TimeWindow::Afternoon], (9, 0), (17, 0))]
    #[case(&[], (9, 0), (17, 0))]
    fn windows_map_to_clock_time(
        settings: SchedulerSettings,
        #[case] windows: &[TimeWindow],
        #[case] start: (u32, u32),
        #[case] end: (u32, u32),
    ) {
        let mut order = order("o1", near_office(1, 1), &[]);
        order.available_times = windows.iter().copied().collect();
        let window = delivery_window(&order, &settings);
        assert_eq!(window.start, at(start.0, start.1));
        assert_eq!(window.end, at(end.0, end.1));
    }

    #[rstest]
    fn single_stop_route_accumulates_drive_and_setup(settings: SchedulerSettings) {
        let input = scenario_a();
        let projections =
            project_schedule(&single_route(&input), &input, &settings).expect("projection");
        let projection = &projections[0];
        let stop = &projection.stops[0];
        // About 2.3 km each way at 40 km/h, then a 47 minute bed setup.
        assert_eq!(stop.drive_minutes, 3);
        assert_eq!(stop.setup_minutes, 47);
        assert_eq!(stop.waited_minutes, 0);
        assert_eq!(stop.arrival, at(9, 3));
        assert_eq!(stop.finish, at(9, 50));
        assert_eq!(stop.products.len(), 1);
        assert_eq!(projection.summary.drive_minutes, 6);
        assert_eq!(projection.summary.return_to_base, at(9, 53));
        assert_eq!(projection.summary.total_stops, 1);
        assert!((projection.summary.distance_miles - 2.9).abs() < 1e-9);
        assert_matches_timeline(projection, &timeline(&input, &settings), &settings);
    }

    #[rstest]
    fn distant_afternoon_stop_keeps_the_solver_clock(settings: SchedulerSettings) {
        let mut input = scenario_a();
        input.orders[0] = order("order-far", near_office(120, 0), &["bed"]);
        input.orders[0].available_times = [TimeWindow::Afternoon].into();

        let projections =
            project_schedule(&single_route(&input), &input, &settings).expect("projection");
        let projection = &projections[0];
        let stop = &projection.stops[0];
        // Roughly 200 minutes each way plus setup: the window is already open.
        assert_eq!(stop.waited_minutes, 0);
        assert_eq!(stop.finish, at(13, 7));
        assert_eq!(stop.arrival, at(12, 20));
        assert_eq!(projection.summary.return_to_base, at(16, 27));
        assert_matches_timeline(projection, &timeline(&input, &settings), &settings);
    }

    #[rstest]
    fn early_stop_waits_for_the_window(mut settings: SchedulerSettings) {
        settings.max_wait_minutes = 200;
        let mut input = scenario_a();
        input.orders[0].available_times = [TimeWindow::Afternoon].into();

        let projections =
            project_schedule(&single_route(&input), &input, &settings).expect("projection");
        let projection = &projections[0];
        let stop = &projection.stops[0];
        assert_eq!(stop.waited_minutes, 190);
        assert_eq!(stop.finish, at(13, 0));
        assert_eq!(stop.arrival, at(12, 13));
        assert_eq!(projection.summary.return_to_base, at(13, 3));
        assert_matches_timeline(projection, &timeline(&input, &settings), &settings);
    }

    #[rstest]
    fn breaks_between_stops_follow_the_solver_clock(mut settings: SchedulerSettings) {
        settings.break_minutes_between_stops = 10;
        let mut input = scenario_a();
        input
            .orders
            .push(order("order-bed-2", near_office(3, -1), &["bed"]));

        let projections =
            project_schedule(&single_route(&input), &input, &settings).expect("projection");
        let projection = &projections[0];
        let (first, second) = (&projection.stops[0], &projection.stops[1]);
        assert!(second.arrival >= first.finish + TimeDelta::minutes(10));
        assert_matches_timeline(projection, &timeline(&input, &settings), &settings);
    }

    #[rstest]
    fn order_notes_carry_through(settings: SchedulerSettings) {
        let mut input = scenario_a();
        input.orders[0].notes = vec!["Gate code 4412".to_owned(), "Call ahead".to_owned()];

        let projections =
            project_schedule(&single_route(&input), &input, &settings).expect("projection");
        assert_eq!(
            projections[0].stops[0].notes,
            vec!["Gate code 4412".to_owned(), "Call ahead".to_owned()]
        );
    }

    #[rstest]
    fn failed_schedule_projects_to_nothing(settings: SchedulerSettings) {
        let projections =
            project_schedule(&Schedule::infeasible(Vec::new()), &scenario_a(), &settings)
                .expect("projection");
        assert!(projections.is_empty());
    }
}
