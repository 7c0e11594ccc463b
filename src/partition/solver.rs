//! Divide-and-conquer solver based on time-window pivots.
//!
//! # Algorithm
//!
//! A node set larger than `p` is split around a randomly drawn pivot:
//! every node that closes before the pivot opens must be visited before
//! it, giving
//!
//! ```text
//! early = { n : n.close <  pivot.open }
//! late  = { n : n.close >= pivot.open }
//! ```
//!
//! The split is accepted only if both parts are non-empty; otherwise a
//! new pivot is drawn, up to `max_split_attempts` times, after which the
//! set is solved directly. Sets of at most `p` nodes are handed to the
//! construction heuristic.
//!
//! Parts are solved strictly in order (early before late). Each leaf
//! starts where the previous one ended: at its last node, with the clock
//! at its final `value`. The result tour is the concatenation of all
//! leaf tours and the delay is their sum.
//!
//! Pending parts live on an explicit stack instead of the call stack, so
//! deep splits of large instances cannot overflow it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constructive::{Construction, ConstructionAlgorithm};
use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::evaluation::return_leg;
use crate::models::{Node, SolutionMetrics, Tour};

use super::config::PartitionConfig;

/// Counters describing how a node set was partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Sets handed to the construction heuristic.
    pub leaves: usize,
    /// Splits into two non-empty parts.
    pub accepted_splits: usize,
    /// Sets larger than `p` that no pivot could split.
    pub failed_splits: usize,
    /// Pivots drawn in total.
    pub split_attempts: usize,
}

/// Complete visiting order produced by [`PartitionSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSolution {
    /// All nodes except the start node, in visit order.
    pub tour: Tour,
    /// Final clock and total delay.
    pub metrics: SolutionMetrics,
    /// Partitioning counters.
    pub stats: PartitionStats,
}

/// Running state threaded through the leaves in visiting order.
struct PartitionState {
    at: Node,
    value: i64,
    delay: i64,
    tour: Tour,
    stats: PartitionStats,
}

/// Recursive time-window partitioner delegating leaves to a construction heuristic.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::GreedyConstructor;
/// use u_tsptw::partition::{PartitionConfig, PartitionSolver};
///
/// let nodes: Vec<Node> = (0..40)
///     .map(|i| {
///         let open = (i as i64 / 10) * 100;
///         Node::new(i, (i % 7) as f64 * 3.0, (i % 5) as f64 * 4.0,
///                   TimeWindow::new(open, open + 99).unwrap())
///     })
///     .collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let solver = PartitionSolver::new(
///     GreedyConstructor::new(0.9, 0.0),
///     PartitionConfig::default().with_p(8),
/// );
/// let mut rng = u_numflow::random::create_rng(42);
/// let solution = solver.solve_from(&nodes, 0, &dm, &mut rng).unwrap();
/// assert_eq!(solution.tour.len(), 39);
/// assert!(solution.stats.leaves >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionSolver<A = Construction> {
    algorithm: A,
    config: PartitionConfig,
}

impl<A: ConstructionAlgorithm> PartitionSolver<A> {
    /// Creates a solver using `algorithm` for every leaf.
    pub fn new(algorithm: A, config: PartitionConfig) -> Self {
        Self { algorithm, config }
    }

    /// The leaf heuristic.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// The solver configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Solves a full instance given as one node list including the start node.
    ///
    /// The node with id `start_id` becomes the start; all others are visited.
    pub fn solve_from<R: Rng>(
        &self,
        nodes: &[Node],
        start_id: usize,
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> Result<PartitionSolution> {
        let start = nodes
            .iter()
            .find(|n| n.id() == start_id)
            .copied()
            .ok_or(TsptwError::StartNotFound { id: start_id })?;
        let rest: Vec<Node> = nodes.iter().filter(|n| n.id() != start_id).copied().collect();
        self.solve(&start, &rest, distances, rng)
    }

    /// Builds a visiting order of `nodes` starting from `start`.
    ///
    /// # Errors
    ///
    /// Rejects the input before any work is done if the configuration or
    /// the heuristic parameters are invalid, a node id is not covered by
    /// `distances`, the matrix is not symmetric, an id repeats, or `nodes`
    /// contains `start`.
    pub fn solve<R: Rng>(
        &self,
        start: &Node,
        nodes: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> Result<PartitionSolution> {
        self.config.validate()?;
        self.algorithm.validate()?;
        validate_nodes(start, nodes, distances)?;

        log::debug!(
            "partitioning {} nodes from start {} (p={}, max_split_attempts={}, algorithm={})",
            nodes.len(),
            start.id(),
            self.config.p,
            self.config.max_split_attempts,
            self.algorithm.name()
        );

        let mut state = PartitionState {
            at: *start,
            value: self.config.start_time,
            delay: 0,
            tour: Tour::with_capacity(nodes.len()),
            stats: PartitionStats::default(),
        };

        let mut pending: Vec<Vec<Node>> = vec![nodes.to_vec()];
        while let Some(set) = pending.pop() {
            if set.len() > self.config.p {
                if let Some((early, late)) = self.split(&set, rng, &mut state.stats) {
                    // LIFO: early is popped first.
                    pending.push(late);
                    pending.push(early);
                    continue;
                }
                log::debug!(
                    "no pivot split {} nodes in {} attempts; solving directly",
                    set.len(),
                    self.config.max_split_attempts
                );
            }
            self.solve_leaf(&set, distances, rng, &mut state);
        }

        if self.config.return_to_start {
            state.value += return_leg(&state.at, start, distances);
        }

        let metrics = SolutionMetrics::new(state.value, state.delay);
        log::debug!(
            "partition finished: value={}, delay={}, leaves={}, splits={}/{}",
            metrics.value,
            metrics.delay,
            state.stats.leaves,
            state.stats.accepted_splits,
            state.stats.split_attempts
        );

        Ok(PartitionSolution {
            tour: state.tour,
            metrics,
            stats: state.stats,
        })
    }

    /// Tries random pivots until one splits `set` into two non-empty parts.
    fn split<R: Rng>(
        &self,
        set: &[Node],
        rng: &mut R,
        stats: &mut PartitionStats,
    ) -> Option<(Vec<Node>, Vec<Node>)> {
        for _ in 0..self.config.max_split_attempts {
            stats.split_attempts += 1;
            let pivot = set[rng.random_range(0..set.len())];
            let (early, late): (Vec<Node>, Vec<Node>) =
                set.iter().partition(|n| n.close() < pivot.open());
            if !early.is_empty() && !late.is_empty() {
                stats.accepted_splits += 1;
                return Some((early, late));
            }
        }
        stats.failed_splits += 1;
        None
    }

    /// Solves one set directly and chains its result onto the running state.
    fn solve_leaf<R: Rng>(
        &self,
        set: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
        state: &mut PartitionState,
    ) {
        let result = self
            .algorithm
            .construct(&state.at, state.value, set, distances, rng);
        log::trace!(
            "leaf of {} nodes from {} at t={}: value={}, delay={}",
            set.len(),
            state.at.id(),
            state.value,
            result.metrics.value,
            result.metrics.delay
        );

        if let Some(last) = result.tour.last() {
            state.at = *last;
        }
        state.value = result.metrics.value;
        state.delay += result.metrics.delay;
        state.tour.extend(result.tour);
        state.stats.leaves += 1;
    }
}

/// Checks that every id is covered by the matrix, unique, and not the start,
/// and that the matrix is symmetric.
fn validate_nodes(start: &Node, nodes: &[Node], distances: &DistanceMatrix) -> Result<()> {
    let size = distances.size();
    if !distances.covers(start.id()) {
        return Err(TsptwError::MissingDistance {
            id: start.id(),
            size,
        });
    }
    if let Some((from, to)) = distances.asymmetric_pair() {
        return Err(TsptwError::AsymmetricDistance { from, to });
    }
    let mut seen = vec![false; size];
    for node in nodes {
        let id = node.id();
        if !distances.covers(id) {
            return Err(TsptwError::MissingDistance { id, size });
        }
        if id == start.id() {
            return Err(TsptwError::ContainsStart { id });
        }
        if seen[id] {
            return Err(TsptwError::DuplicateNode { id });
        }
        seen[id] = true;
    }
    Ok(())
}
