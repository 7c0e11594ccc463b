//! Adaptive multi-start biased-randomised search.
//!
//! # Algorithm
//!
//! Repeats the biased greedy pass a fixed number of times. Each pass
//! rebuilds the incumbent order with the current prefix fraction `beta`:
//!
//! - improvement (strictly lower `value + delay`): adopt the new order and
//!   reset `beta` to `beta_start`, searching close to the improving region;
//! - otherwise: `beta = min(beta + beta_step, beta_end)`.
//!
//! There is no early termination; the full iteration budget is spent.
//!
//! # Reference
//!
//! Juan, A.A., Faulin, J., Ruiz, R., Barrios, B. & Caballé, S. (2010).
//! "The SR-GCWS hybrid algorithm for solving the capacitated vehicle
//! routing problem", *Applied Soft Computing* 10(1), 215-224.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::models::Node;

use super::algorithm::{ConstructionAlgorithm, ConstructionResult};
use super::greedy::GreedyConstructor;

/// Multi-start wrapper around [`GreedyConstructor`].
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::{ConstructionAlgorithm, MultiStartBiasedSearch};
///
/// let tw = TimeWindow::new(0, 1000).unwrap();
/// let nodes: Vec<Node> = (0..6).map(|i| Node::new(i, i as f64 * 5.0, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let search = MultiStartBiasedSearch::new(0.3)
///     .with_beta_range(0.0, 0.6, 0.2)
///     .with_max_iterations(200);
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = search.construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
/// assert_eq!(result.tour.len(), 5);
/// assert!(result.metrics.value >= 25);
/// assert_eq!(result.metrics.delay, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiStartBiasedSearch {
    /// Bias strength of every inner greedy pass.
    pub alpha: f64,
    /// Prefix fraction used after an improvement (and initially).
    pub beta_start: f64,
    /// Upper bound for the prefix fraction.
    pub beta_end: f64,
    /// Increase of the prefix fraction after a non-improving pass.
    pub beta_step: f64,
    /// Number of greedy passes.
    pub max_iterations: usize,
}

impl MultiStartBiasedSearch {
    /// Creates a search with the given bias strength and default schedule.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn with_beta_range(mut self, start: f64, end: f64, step: f64) -> Self {
        self.beta_start = start;
        self.beta_end = end;
        self.beta_step = step;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Prefix fraction for the pass following one at `beta`.
    fn next_beta(&self, beta: f64, improved: bool) -> f64 {
        if improved {
            self.beta_start
        } else {
            (beta + self.beta_step).min(self.beta_end)
        }
    }
}

impl Default for MultiStartBiasedSearch {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            beta_start: 0.0,
            beta_end: 0.5,
            beta_step: 0.1,
            max_iterations: 3000,
        }
    }
}

impl ConstructionAlgorithm for MultiStartBiasedSearch {
    fn name(&self) -> &str {
        "multi_start_biased"
    }

    fn validate(&self) -> Result<()> {
        GreedyConstructor::new(self.alpha, self.beta_start).validate()?;
        GreedyConstructor::new(self.alpha, self.beta_end).validate()?;
        if self.beta_start > self.beta_end {
            return Err(TsptwError::InvalidConfig(format!(
                "beta_start ({}) must not exceed beta_end ({})",
                self.beta_start, self.beta_end
            )));
        }
        if self.beta_step.is_nan() || self.beta_step < 0.0 {
            return Err(TsptwError::InvalidConfig(format!(
                "beta_step must be non-negative, got {}",
                self.beta_step
            )));
        }
        if self.max_iterations == 0 {
            return Err(TsptwError::InvalidConfig(
                "max_iterations must be at least 1".into(),
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
        let mut beta = self.beta_start;
        let mut best: Option<ConstructionResult> = None;

        for iter in 0..self.max_iterations {
            let order = best.as_ref().map_or(nodes, |b| b.tour.nodes());
            let candidate = GreedyConstructor::new(self.alpha, beta)
                .construct(start, start_value, order, distances, rng);

            let improved = best.as_ref().map_or(true, |b| candidate.cost() < b.cost());
            if improved {
                log::trace!(
                    "multi-start pass {iter}: cost {} at beta {beta:.3}",
                    candidate.cost()
                );
                best = Some(candidate);
            }
            beta = self.next_beta(beta, improved);
        }

        best.unwrap_or_else(|| {
            ConstructionResult::evaluated(start, start_value, nodes.to_vec(), distances)
        })
    }
}
