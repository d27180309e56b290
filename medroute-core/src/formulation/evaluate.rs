//! Replay of a route through the time dimension.
//!
//! Engines use this to certify their output before handing it back, and the
//! decoder uses it to refuse schedules that break a hard constraint.

use thiserror::Error;

use super::{DEPOT, RoutingProblem};

/// One visited stop with its time-dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Node index of the stop.
    pub node: usize,
    /// Cumulative minutes when service at the stop is complete.
    pub minute: u32,
    /// Minutes spent waiting for the window to open.
    pub waited: u32,
}

/// A feasible route replayed from the depot back to the depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTimeline {
    /// Route index.
    pub route: usize,
    /// Stops in visiting order.
    pub visits: Vec<Visit>,
    /// Cumulative minutes on return to the depot; zero for an unused route.
    pub end_minute: u32,
    /// Sum of arc costs, depot to depot.
    pub arc_cost: i64,
}

impl RouteTimeline {
    /// Whether the route visits no stops.
    pub fn is_unused(&self) -> bool {
        self.visits.is_empty()
    }
}

/// The first hard constraint a route breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteViolation {
    /// The route index does not exist.
    #[error("route {route} does not exist")]
    UnknownRoute {
        /// Offending route index.
        route: usize,
    },
    /// The node is not a visitable order stop.
    #[error("node {node} is not an order stop of this problem")]
    NotAStop {
        /// Offending node.
        node: usize,
    },
    /// The stop is not allowed on this route.
    #[error("route {route} may not visit node {node}")]
    RouteNotAllowed {
        /// Route index.
        route: usize,
        /// Offending node.
        node: usize,
    },
    /// Arrival precedes the window by more than the permitted wait.
    #[error("node {node} reached at minute {arrival}, window opens at {opens}")]
    TooEarly {
        /// Offending node.
        node: usize,
        /// Arrival minute.
        arrival: u32,
        /// Window start.
        opens: u32,
    },
    /// Arrival is after the window closes.
    #[error("node {node} reached at minute {minute}, window closed at {closes}")]
    TooLate {
        /// Offending node.
        node: usize,
        /// Arrival minute.
        minute: u32,
        /// Window end.
        closes: u32,
    },
    /// Cumulative time passes the workday cap.
    #[error("route needs {minute} minutes, workday cap is {capacity}")]
    OverCapacity {
        /// Cumulative minutes at the failing point.
        minute: u32,
        /// Workday cap.
        capacity: u32,
    },
    /// A used route returns to the depot before the minimum end time.
    #[error("route ends at minute {end}, minimum is {minimum}")]
    EndsTooEarly {
        /// End minute.
        end: u32,
        /// Required minimum.
        minimum: u32,
    },
}

impl RoutingProblem {
    /// Replay `nodes` on `route`, starting at minute zero at the depot.
    ///
    /// Depot entries in `nodes` are ignored; every route starts and ends at
    /// the depot. The minimum end time only applies to routes that visit a
    /// stop.
    ///
    /// # Errors
    /// Returns the first [`RouteViolation`] encountered.
    pub fn evaluate_route(
        &self,
        route: usize,
        nodes: &[usize],
    ) -> Result<RouteTimeline, RouteViolation> {
        if route >= self.route_count() {
            return Err(RouteViolation::UnknownRoute { route });
        }
        let capacity = self.time.capacity;
        let mut visits = Vec::with_capacity(nodes.len());
        let mut clock = 0_u32;
        let mut arc_cost = 0_i64;
        let mut at = DEPOT;

        for &node in nodes.iter().filter(|&&node| node != DEPOT) {
            let stop = self
                .stop(node)
                .ok_or(RouteViolation::NotAStop { node })?;
            if !stop.allowed_routes.contains(&route) {
                return Err(RouteViolation::RouteNotAllowed { route, node });
            }
            let arrival = clock.saturating_add(self.transit_minutes(at, node));
            let waited = stop.window.earliest.saturating_sub(arrival);
            if waited > self.time.max_wait {
                return Err(RouteViolation::TooEarly {
                    node,
                    arrival,
                    opens: stop.window.earliest,
                });
            }
            let minute = arrival + waited;
            if minute > stop.window.latest {
                return Err(RouteViolation::TooLate {
                    node,
                    minute,
                    closes: stop.window.latest,
                });
            }
            if minute > capacity {
                return Err(RouteViolation::OverCapacity { minute, capacity });
            }
            arc_cost += self.arc_cost(at, node);
            visits.push(Visit {
                node,
                minute,
                waited,
            });
            clock = minute;
            at = node;
        }

        if visits.is_empty() {
            return Ok(RouteTimeline {
                route,
                visits,
                end_minute: 0,
                arc_cost: 0,
            });
        }

        let end_minute = clock.saturating_add(self.transit_minutes(at, DEPOT));
        if end_minute > capacity {
            return Err(RouteViolation::OverCapacity {
                minute: end_minute,
                capacity,
            });
        }
        if end_minute < self.time.min_route_end {
            return Err(RouteViolation::EndsTooEarly {
                end: end_minute,
                minimum: self.time.min_route_end,
            });
        }
        arc_cost += self.arc_cost(at, DEPOT);
        Ok(RouteTimeline {
            route,
            visits,
            end_minute,
            arc_cost,
        })
    }
}
