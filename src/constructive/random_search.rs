//! Random-shuffle search baseline.
//!
//! Scores a number of uniformly random visiting orders and keeps the one
//! with the lowest `value + delay`. Useful as a reference point for the
//! greedy-based heuristics.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::models::Node;

use super::algorithm::{ConstructionAlgorithm, ConstructionResult};

/// Best of `iterations + 1` random visiting orders.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::{ConstructionAlgorithm, RandomSearch};
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let nodes: Vec<Node> = (0..4).map(|i| Node::new(i, i as f64, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = RandomSearch::new(500).construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
/// assert_eq!(result.tour.ids(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSearch {
    /// Number of additional shuffles after the first one.
    pub iterations: usize,
}

impl RandomSearch {
    /// Creates a random search with the given number of shuffles.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ConstructionAlgorithm for RandomSearch {
    fn name(&self) -> &str {
        "random_search"
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(TsptwError::InvalidConfig(
                "random search needs at least 1 iteration".into(),
            ));
        }
        Ok(())
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
        u_numflow::random::shuffle(&mut order, rng);
        let mut best = ConstructionResult::evaluated(start, start_value, order, distances);

        for _ in 0..self.iterations {
            let mut order = nodes.to_vec();
            u_numflow::random::shuffle(&mut order, rng);
            let candidate = ConstructionResult::evaluated(start, start_value, order, distances);
            if candidate.cost() < best.cost() {
                best = candidate;
            }
        }
        best
    }
}
