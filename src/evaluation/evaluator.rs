//! Time-window cost model.
//!
//! Simulates a visiting order against the nodes' time windows:
//!
//! ```text
//! current = max(next.open, current + d(cursor, next))
//! delay  += max(0, current - next.close)
//! ```
//!
//! Early arrivals wait (the waiting is folded into `value`), late
//! arrivals are allowed and penalized through `delay`.

use crate::distance::DistanceMatrix;
use crate::models::{Node, SolutionMetrics};

/// Simulation state while walking a visiting order.
///
/// Holds the last visited node, the clock after that visit, and the
/// lateness accumulated so far. [`evaluate`] and the constructive
/// heuristics share this stepping rule.
#[derive(Debug, Clone, Copy)]
pub struct TimeCursor {
    node: Node,
    time: i64,
    delay: i64,
}

impl TimeCursor {
    /// Starts a simulation at `start` with the clock at `start_value`.
    pub fn new(start: Node, start_value: i64) -> Self {
        Self {
            node: start,
            time: start_value,
            delay: 0,
        }
    }

    /// Visits `next`, advancing the clock and accumulating lateness.
    pub fn advance(&mut self, next: &Node, distances: &DistanceMatrix) {
        let arrival = self.time + distances.get(self.node.id(), next.id());
        self.time = next.time_window().start_of_service(arrival);
        self.delay += next.time_window().lateness(self.time);
        self.node = *next;
    }

    /// Last visited node (the start node before any visit).
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Current clock.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Lateness accumulated so far.
    pub fn delay(&self) -> i64 {
        self.delay
    }

    /// Current `(value, delay)` pair.
    pub fn metrics(&self) -> SolutionMetrics {
        SolutionMetrics::new(self.time, self.delay)
    }
}

/// Scores a fixed visiting order.
///
/// Starting at `start` with the clock at `start_value`, visits `ordered`
/// in sequence and returns the final clock and the summed lateness. An
/// empty sequence yields `(start_value, 0)`.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::evaluation::evaluate;
///
/// let nodes = vec![
///     Node::new(0, 0.0, 0.0, TimeWindow::new(0, 0).unwrap()),
///     Node::new(1, 10.0, 0.0, TimeWindow::new(20, 40).unwrap()),
///     Node::new(2, 30.0, 0.0, TimeWindow::new(0, 30).unwrap()),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// // Arrive at 1 at t=10, wait until 20; reach 2 at t=40, 10 late.
/// let m = evaluate(&nodes[0], 0, &nodes[1..], &dm);
/// assert_eq!((m.value, m.delay), (40, 10));
/// ```
pub fn evaluate(
    start: &Node,
    start_value: i64,
    ordered: &[Node],
    distances: &DistanceMatrix,
) -> SolutionMetrics {
    let mut cursor = TimeCursor::new(*start, start_value);
    for next in ordered {
        cursor.advance(next, distances);
    }
    cursor.metrics()
}

/// Greedy desirability of visiting `candidate` next: projected start of
/// service minus projected lateness. Lower is better.
pub fn arrival_score(
    cursor: &Node,
    current: i64,
    candidate: &Node,
    distances: &DistanceMatrix,
) -> i64 {
    let arrival = current + distances.get(cursor.id(), candidate.id());
    candidate.time_window().start_of_service(arrival) - candidate.time_window().lateness(arrival)
}

/// Travel time from the last visited node back to `start`.
pub fn return_leg(last: &Node, start: &Node, distances: &DistanceMatrix) -> i64 {
    distances.get(last.id(), start.id())
}
