//! 2-opt descent on the time-window objective.
//!
//! # Algorithm
//!
//! Scan segments `tour[i..j]` with at least two nodes in order of `i`,
//! then `j`. Reverse the segment and re-simulate the whole order. If
//! `value + delay` strictly decreases, keep the reversal and restart the
//! scan from `i = 0`; otherwise undo it. Stops once a full scan finds no
//! improving reversal (first-improvement with restart).
//!
//! Unlike the distance-only variant, the delta of a reversal is not local:
//! arrival times after the segment shift too, so each candidate is
//! scored with a full simulation.
//!
//! # Complexity
//!
//! O(n³) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constructive::{ConstructionAlgorithm, ConstructionResult};
use crate::distance::DistanceMatrix;
use crate::evaluation::evaluate;
use crate::models::{Node, SolutionMetrics, Tour};

/// Improves `order` in place by segment reversals; returns its final metrics.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::local_search::two_opt_improve;
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let nodes: Vec<Node> = (0..4).map(|i| Node::new(i, i as f64 * 10.0, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let mut order = vec![nodes[3], nodes[2], nodes[1]];
/// let m = two_opt_improve(&nodes[0], 0, &mut order, &dm);
/// assert_eq!(order.iter().map(|n| n.id()).collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(m.value, 30);
/// ```
pub fn two_opt_improve(
    start: &Node,
    start_value: i64,
    order: &mut [Node],
    distances: &DistanceMatrix,
) -> SolutionMetrics {
    let mut best = evaluate(start, start_value, order, distances);
    let n = order.len();
    if n < 2 {
        return best;
    }

    let mut i = 0;
    while i + 1 < n {
        match improving_reversal(start, start_value, order, distances, i, best.cost()) {
            Some(candidate) => {
                best = candidate;
                i = 0;
            }
            None => i += 1,
        }
    }
    best
}

/// Tries every segment starting at `i`; keeps the first reversal that beats `cost`.
fn improving_reversal(
    start: &Node,
    start_value: i64,
    order: &mut [Node],
    distances: &DistanceMatrix,
    i: usize,
    cost: i64,
) -> Option<SolutionMetrics> {
    for j in i + 2..=order.len() {
        order[i..j].reverse();
        let candidate = evaluate(start, start_value, order, distances);
        if candidate.cost() < cost {
            return Some(candidate);
        }
        order[i..j].reverse();
    }
    None
}

/// Random starting order followed by [`two_opt_improve`].
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::ConstructionAlgorithm;
/// use u_tsptw::local_search::TwoOpt;
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let nodes: Vec<Node> = (0..5).map(|i| Node::new(i, i as f64 * 10.0, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = TwoOpt::new().construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
/// assert_eq!(result.tour.ids(), vec![1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoOpt {
    shuffle: bool,
}

impl TwoOpt {
    /// Creates a 2-opt descent starting from a shuffled order.
    pub fn new() -> Self {
        Self { shuffle: true }
    }

    /// Starts the descent from the incoming order instead of a shuffle.
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }
}

impl Default for TwoOpt {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionAlgorithm for TwoOpt {
    fn name(&self) -> &str {
        "two_opt"
    }

    fn construct<R: Rng>(
        &self,
        start: &Node,
        start_value: i64,
        nodes: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> ConstructionResult {
        let mut order = nodes.to_vec();
        if self.shuffle {
            u_numflow::random::shuffle(&mut order, rng);
        }
        let metrics = two_opt_improve(start, start_value, &mut order, distances);
        ConstructionResult {
            tour: Tour::from(order),
            metrics,
        }
    }
}
