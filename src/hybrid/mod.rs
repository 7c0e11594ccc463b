//! Hybrid tabu search and simulated annealing.
//!
//! # Algorithm
//!
//! 1. Start from the nodes sorted by ascending closing time.
//! 2. If that order is late somewhere, run a tabu search that minimises
//!    total lateness alone, using shift-left (late node earlier),
//!    shift-right (waiting node later), segment reversal and swap moves.
//! 3. Anneal the repaired order on `value + delay` with the same moves,
//!    occasionally relocating a fraction of the nodes at random.
//!
//! Both phases run on an RNG seeded from the caller's generator, so the
//! result is reproducible under a fixed seed.
//!
//! # Reference
//!
//! Küçükoğlu, İ., Dewil, R. & Cattrysse, D. (2019). "Hybrid simulated
//! annealing and tabu search method for the electric travelling salesman
//! problem with time windows and mixed charging rates", *Expert Systems
//! with Applications* 134, 279-303.

mod moves;
mod problem;

use rand::Rng;
use serde::{Deserialize, Serialize};
use u_metaheur::sa::{CoolingSchedule, SaConfig, SaRunner};
use u_metaheur::tabu::{TabuConfig, TabuRunner};

use crate::constructive::{ConstructionAlgorithm, ConstructionResult};
use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::models::Node;

use problem::{AnnealingProblem, LeafContext, RepairProblem};

/// Lateness repair by tabu search followed by simulated annealing.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::ConstructionAlgorithm;
/// use u_tsptw::hybrid::HybridTabuAnnealing;
///
/// let nodes: Vec<Node> = (0..6)
///     .map(|i| {
///         let close = if i == 0 { 1000 } else { 15 * i as i64 };
///         Node::new(i, i as f64 * 10.0, 0.0, TimeWindow::new(0, close).unwrap())
///     })
///     .collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let search = HybridTabuAnnealing::default().with_iterations(300);
/// let mut rng = u_numflow::random::create_rng(42);
/// let input: Vec<Node> = nodes[1..].iter().rev().copied().collect();
/// let result = search.construct(&nodes[0], 0, &input, &dm, &mut rng);
/// assert_eq!(result.tour.len(), 5);
/// // Sorting by closing time is already on time here: 10, 20, .., 50.
/// assert!(result.cost() <= 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridTabuAnnealing {
    /// Annealing iterations (neighbour evaluations).
    pub iterations: usize,
    /// Starting temperature of the annealing phase.
    pub initial_temperature: f64,
    /// Temperature below which annealing stops early.
    pub min_temperature: f64,
    /// Geometric cooling factor in `(0, 1)`.
    pub cooling: f64,
    /// Iterations between two cooling steps.
    pub iterations_per_temperature: usize,
    /// Probability of perturbing an annealing neighbour.
    pub perturbation: f64,
    /// Fraction of the nodes relocated by one perturbation.
    pub perturbed: f64,
    /// Iterations a repair move stays tabu.
    pub tabu_tenure: usize,
    /// Tabu search iterations of the repair phase.
    pub repair_iterations: usize,
    /// Moves sampled per tabu iteration.
    pub neighborhood_size: usize,
}

impl Default for HybridTabuAnnealing {
    fn default() -> Self {
        Self {
            iterations: 1000,
            initial_temperature: 500.0,
            min_temperature: 0.01,
            cooling: 0.95,
            iterations_per_temperature: 10,
            perturbation: 0.1,
            perturbed: 0.1,
            tabu_tenure: 400,
            repair_iterations: 200,
            neighborhood_size: 20,
        }
    }
}

impl HybridTabuAnnealing {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_temperature(mut self, initial: f64, min: f64, cooling: f64) -> Self {
        self.initial_temperature = initial;
        self.min_temperature = min;
        self.cooling = cooling;
        self
    }

    pub fn with_perturbation(mut self, probability: f64, fraction: f64) -> Self {
        self.perturbation = probability;
        self.perturbed = fraction;
        self
    }

    pub fn with_repair(mut self, iterations: usize, tabu_tenure: usize) -> Self {
        self.repair_iterations = iterations;
        self.tabu_tenure = tabu_tenure;
        self
    }

    fn sa_config(&self, seed: u64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(self.min_temperature)
            .with_cooling(CoolingSchedule::Geometric {
                alpha: self.cooling,
            })
            .with_iterations_per_temperature(self.iterations_per_temperature)
            .with_max_iterations(self.iterations)
            .with_seed(seed)
    }

    fn tabu_config(&self, seed: u64) -> TabuConfig {
        TabuConfig::default()
            .with_max_iterations(self.repair_iterations)
            .with_tabu_tenure(self.tabu_tenure)
            .with_max_no_improve(self.repair_iterations)
            .with_seed(seed)
    }
}

impl ConstructionAlgorithm for HybridTabuAnnealing {
    fn name(&self) -> &str {
        "hybrid_tabu_annealing"
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(TsptwError::InvalidConfig(
                "annealing needs at least 1 iteration".into(),
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(TsptwError::InvalidConfig(
                "iterations_per_temperature must be at least 1".into(),
            ));
        }
        if self.tabu_tenure == 0 || self.neighborhood_size == 0 {
            return Err(TsptwError::InvalidConfig(
                "tabu_tenure and neighborhood_size must be at least 1".into(),
            ));
        }
        for (name, p) in [("perturbation", self.perturbation), ("perturbed", self.perturbed)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(TsptwError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }
        if self.initial_temperature.is_nan() || self.min_temperature.is_nan() {
            return Err(TsptwError::InvalidConfig(
                "temperatures must be numbers".into(),
            ));
        }
        self.sa_config(0).validate().map_err(TsptwError::InvalidConfig)
    }

    fn construct<R: Rng>(
        &self,
        start: &Node,
        start_value: i64,
        nodes: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> ConstructionResult {
        if nodes.len() < 2 {
            return ConstructionResult::evaluated(start, start_value, nodes.to_vec(), distances);
        }
        let context = LeafContext {
            start,
            start_value,
            distances,
        };

        let mut initial = nodes.to_vec();
        initial.sort_by_key(|n| n.close());
        let initial_metrics = context.metrics(&initial);

        let repaired = if initial_metrics.is_on_time() {
            initial
        } else {
            let problem = RepairProblem {
                context,
                initial,
                neighborhood_size: self.neighborhood_size,
            };
            let result = TabuRunner::run(&problem, &self.tabu_config(rng.random()));
            log::trace!(
                "tabu repair: delay {} -> {} in {} iterations",
                initial_metrics.delay,
                result.best_cost,
                result.iterations
            );
            result.best
        };

        let config = self.sa_config(rng.random());
        if let Err(reason) = config.validate() {
            log::warn!("skipping annealing: {reason}");
            return ConstructionResult::evaluated(start, start_value, repaired, distances);
        }
        let problem = AnnealingProblem {
            context,
            initial: repaired,
            perturbation: self.perturbation,
            perturbed: self.perturbed,
        };
        let result = SaRunner::run(&problem, &config);
        log::trace!(
            "annealing: best cost {} after {} iterations ({} accepted)",
            result.best_cost,
            result.iterations,
            result.accepted_moves
        );
        ConstructionResult::evaluated(start, start_value, result.best, distances)
    }
}
