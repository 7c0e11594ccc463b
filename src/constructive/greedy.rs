//! Biased-randomised greedy construction.
//!
//! # Algorithm
//!
//! The first `floor(beta * n)` nodes of the incoming order are kept as a
//! fixed prefix. The remaining nodes are appended one at a time: at each
//! step the candidates are sorted by
//!
//! ```text
//! score(j) = max(t + d(i, j), open_j) - max(0, t + d(i, j) - close_j)
//! ```
//!
//! where `i` is the last visited node and `t` the current clock, and a
//! rank is drawn from the quasi-geometric distribution
//! `P(k) ∝ (1 - alpha)^k`. With `alpha` close to 1 the pass is a plain
//! greedy; with `alpha` close to 0 the pick is nearly uniform.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of nodes.
//!
//! # Reference
//!
//! Grasas, A., Juan, A.A., Faulin, J., de Armas, J. & Ramalhinho, H. (2017).
//! "Biased randomization of heuristics using skewed probability
//! distributions", *Computers & Industrial Engineering* 110, 216-228.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::evaluation::{arrival_score, TimeCursor};
use crate::models::{Node, Tour};

use super::algorithm::{ConstructionAlgorithm, ConstructionResult};

/// Draws a rank in `0..len` from a quasi-geometric distribution.
///
/// Computes `floor(ln(u) / ln(1 - alpha)) mod len` with `u` uniform in
/// `(0, 1]`. Rank 0 is the most likely outcome; its probability grows
/// toward 1 as `alpha` approaches 1.
///
/// A single candidate is returned without consuming randomness.
///
/// # Panics
///
/// Panics if `len == 0`.
///
/// # Examples
///
/// ```
/// use u_tsptw::constructive::biased_index;
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let idx = biased_index(10, 0.3, &mut rng);
/// assert!(idx < 10);
/// assert_eq!(biased_index(1, 0.3, &mut rng), 0);
/// ```
pub fn biased_index<R: Rng>(len: usize, alpha: f64, rng: &mut R) -> usize {
    assert!(len > 0, "cannot select from an empty list");
    if len == 1 {
        return 0;
    }
    let u = 1.0 - rng.random::<f64>();
    // ln_1p keeps ln(1 - alpha) non-zero for alpha below f64 epsilon.
    let rank = (u.ln() / (-alpha).ln_1p()).floor();
    // Saturating float-to-int conversion keeps extreme draws in range.
    (rank as usize) % len
}

/// Greedy constructor with quasi-geometric biased selection.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::{ConstructionAlgorithm, GreedyConstructor};
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let nodes: Vec<Node> = (0..4).map(|i| Node::new(i, i as f64 * 10.0, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// // Shuffled input, nothing fixed: the greedy recovers the line order.
/// let input = vec![nodes[3], nodes[1], nodes[2]];
/// let mut rng = u_numflow::random::create_rng(1);
/// let result = GreedyConstructor::new(0.999999, 0.0)
///     .construct(&nodes[0], 0, &input, &dm, &mut rng);
/// assert_eq!(result.tour.ids(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreedyConstructor {
    alpha: f64,
    beta: f64,
}

impl GreedyConstructor {
    /// Creates a greedy constructor.
    ///
    /// * `alpha` — bias strength in `(0, 1)`
    /// * `beta` — fraction of the incoming order kept fixed, in `[0, 1]`
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Bias strength.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fraction of the incoming order kept fixed.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of leading nodes kept in place for a set of `n` nodes.
    fn fixed_prefix(&self, n: usize) -> usize {
        ((self.beta * n as f64).floor() as usize).min(n)
    }
}

impl Default for GreedyConstructor {
    fn default() -> Self {
        Self::new(0.999, 0.0)
    }
}

impl ConstructionAlgorithm for GreedyConstructor {
    fn name(&self) -> &str {
        "greedy"
    }

    fn validate(&self) -> Result<()> {
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(TsptwError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(TsptwError::InvalidConfig(format!(
                "beta must be in [0, 1], got {}",
                self.beta
            )));
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
        let fixed = self.fixed_prefix(nodes.len());
        let mut cursor = TimeCursor::new(*start, start_value);
        let mut tour = Tour::with_capacity(nodes.len());

        for node in &nodes[..fixed] {
            cursor.advance(node, distances);
            tour.push(*node);
        }

        append_by_score(&mut cursor, &mut tour, nodes[fixed..].to_vec(), distances, |len| {
            biased_index(len, self.alpha, rng)
        });

        ConstructionResult {
            tour,
            metrics: cursor.metrics(),
        }
    }
}

/// Deterministic greedy pass: always takes the best-scored candidate.
pub(crate) fn pure_greedy(
    start: &Node,
    start_value: i64,
    nodes: &[Node],
    distances: &DistanceMatrix,
) -> ConstructionResult {
    let mut cursor = TimeCursor::new(*start, start_value);
    let mut tour = Tour::with_capacity(nodes.len());
    append_by_score(&mut cursor, &mut tour, nodes.to_vec(), distances, |_| 0);
    ConstructionResult {
        tour,
        metrics: cursor.metrics(),
    }
}

/// Appends every option to `tour`, re-ranking by arrival score before each
/// pick; `pick(len)` chooses the rank to take.
fn append_by_score<F>(
    cursor: &mut TimeCursor,
    tour: &mut Tour,
    mut options: Vec<Node>,
    distances: &DistanceMatrix,
    mut pick: F,
) where
    F: FnMut(usize) -> usize,
{
    while !options.is_empty() {
        let at = *cursor.node();
        let now = cursor.time();
        options.sort_by_cached_key(|n| arrival_score(&at, now, n, distances));

        let next = options.remove(pick(options.len()));
        cursor.advance(&next, distances);
        tour.push(next);
    }
}
