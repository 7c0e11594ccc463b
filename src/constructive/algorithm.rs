//! Construction capability shared by all heuristics.

use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::evaluation::evaluate;
use crate::hybrid::HybridTabuAnnealing;
use crate::local_search::TwoOpt;
use crate::models::{Node, SolutionMetrics, Tour};

use super::greedy::GreedyConstructor;
use super::multi_start::MultiStartBiasedSearch;
use super::particle_swarm::ParticleSwarm;
use super::random_search::RandomSearch;

/// A visiting order together with its simulated `(value, delay)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionResult {
    /// Nodes in visit order.
    pub tour: Tour,
    /// Clock and lateness after the last visit.
    pub metrics: SolutionMetrics,
}

impl ConstructionResult {
    /// Scores `order` as-is, starting at `start` with the clock at `start_value`.
    pub fn evaluated(
        start: &Node,
        start_value: i64,
        order: Vec<Node>,
        distances: &DistanceMatrix,
    ) -> Self {
        let metrics = evaluate(start, start_value, &order, distances);
        Self {
            tour: Tour::from(order),
            metrics,
        }
    }

    /// Penalized objective `value + delay`.
    pub fn cost(&self) -> i64 {
        self.metrics.cost()
    }
}

/// Builds a visiting order for a node set.
///
/// Implementations receive the node the vehicle currently stands on, the
/// current clock, the nodes still to visit, and the travel-time matrix.
/// The returned tour is a permutation of `nodes`.
///
/// Callers guarantee that `nodes` holds no duplicate ids and does not
/// contain `start`; [`PartitionSolver`](crate::partition::PartitionSolver)
/// checks this once before any construction runs.
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
/// let mut rng = u_numflow::random::create_rng(42);
/// let greedy = GreedyConstructor::new(0.9999, 1.0);
/// let result = greedy.construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
/// assert_eq!(result.tour.ids(), vec![1, 2, 3]);
/// assert_eq!((result.metrics.value, result.metrics.delay), (30, 0));
/// ```
pub trait ConstructionAlgorithm {
    /// Short identifier used in log output.
    fn name(&self) -> &str;

    /// Checks the algorithm's parameters.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Builds a visiting order for `nodes`, starting from `start` at time `start_value`.
    fn construct<R: Rng>(
        &self,
        start: &Node,
        start_value: i64,
        nodes: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> ConstructionResult;
}

/// The available construction heuristics.
///
/// Lets a [`PartitionSolver`](crate::partition::PartitionSolver) be
/// configured at runtime with any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Single biased-randomised greedy pass.
    Greedy(GreedyConstructor),
    /// Adaptive multi-start over the greedy pass.
    MultiStart(MultiStartBiasedSearch),
    /// Best of repeated random shuffles.
    RandomSearch(RandomSearch),
    /// 2-opt descent on `value + delay`.
    TwoOpt(TwoOpt),
    /// Discrete particle swarm.
    ParticleSwarm(ParticleSwarm),
    /// Tabu lateness repair, then simulated annealing.
    HybridTabuAnnealing(HybridTabuAnnealing),
}

impl ConstructionAlgorithm for Construction {
    fn name(&self) -> &str {
        match self {
            Construction::Greedy(a) => a.name(),
            Construction::MultiStart(a) => a.name(),
            Construction::RandomSearch(a) => a.name(),
            Construction::TwoOpt(a) => a.name(),
            Construction::ParticleSwarm(a) => a.name(),
            Construction::HybridTabuAnnealing(a) => a.name(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Construction::Greedy(a) => a.validate(),
            Construction::MultiStart(a) => a.validate(),
            Construction::RandomSearch(a) => a.validate(),
            Construction::TwoOpt(a) => a.validate(),
            Construction::ParticleSwarm(a) => a.validate(),
            Construction::HybridTabuAnnealing(a) => a.validate(),
        }
    }

    fn construct<R: Rng>(
        &self,
        start: &Node,
        start_value: i64,
        nodes: &[Node],
        distances: &DistanceMatrix,
        rng: &mut R,
    ) -> ConstructionResult {
        match self {
            Construction::Greedy(a) => a.construct(start, start_value, nodes, distances, rng),
            Construction::MultiStart(a) => a.construct(start, start_value, nodes, distances, rng),
            Construction::RandomSearch(a) => a.construct(start, start_value, nodes, distances, rng),
            Construction::TwoOpt(a) => a.construct(start, start_value, nodes, distances, rng),
            Construction::ParticleSwarm(a) => a.construct(start, start_value, nodes, distances, rng),
            Construction::HybridTabuAnnealing(a) => {
                a.construct(start, start_value, nodes, distances, rng)
            }
        }
    }
}

impl From<GreedyConstructor> for Construction {
    fn from(a: GreedyConstructor) -> Self {
        Construction::Greedy(a)
    }
}

impl From<MultiStartBiasedSearch> for Construction {
    fn from(a: MultiStartBiasedSearch) -> Self {
        Construction::MultiStart(a)
    }
}

impl From<RandomSearch> for Construction {
    fn from(a: RandomSearch) -> Self {
        Construction::RandomSearch(a)
    }
}

impl From<TwoOpt> for Construction {
    fn from(a: TwoOpt) -> Self {
        Construction::TwoOpt(a)
    }
}

impl From<ParticleSwarm> for Construction {
    fn from(a: ParticleSwarm) -> Self {
        Construction::ParticleSwarm(a)
    }
}

impl From<HybridTabuAnnealing> for Construction {
    fn from(a: HybridTabuAnnealing) -> Self {
        Construction::HybridTabuAnnealing(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn setup() -> (Vec<Node>, DistanceMatrix) {
        let nodes: Vec<Node> = [(0, 100), (0, 100), (25, 40), (0, 15), (60, 90)]
            .iter()
            .enumerate()
            .map(|(i, &(o, c))| {
                Node::new(
                    i,
                    (i * 7 % 5) as f64 * 6.0,
                    i as f64 * 3.0,
                    TimeWindow::new(o, c).expect("valid"),
                )
            })
            .collect();
        let dm = DistanceMatrix::from_nodes(&nodes);
        (nodes, dm)
    }

    fn sorted_ids(r: &ConstructionResult) -> Vec<usize> {
        let mut ids = r.tour.ids();
        ids.sort();
        ids
    }

    #[test]
    fn test_evaluated_result() {
        let (nodes, dm) = setup();
        let r = ConstructionResult::evaluated(&nodes[0], 5, nodes[1..].to_vec(), &dm);
        assert_eq!(r.tour.ids(), vec![1, 2, 3, 4]);
        assert_eq!(r.metrics, evaluate(&nodes[0], 5, &nodes[1..], &dm));
        assert_eq!(r.cost(), r.metrics.value + r.metrics.delay);
    }

    #[test]
    fn test_every_variant_returns_permutation() {
        let (nodes, dm) = setup();
        let variants: Vec<Construction> = vec![
            GreedyConstructor::new(0.7, 0.0).into(),
            MultiStartBiasedSearch::new(0.7).with_max_iterations(20).into(),
            RandomSearch::new(20).into(),
            TwoOpt::new().into(),
            ParticleSwarm::default().with_particles(5).with_iterations(20, 5).into(),
            HybridTabuAnnealing::default().with_iterations(100).with_repair(20, 10).into(),
        ];
        let mut rng = u_numflow::random::create_rng(42);
        for v in &variants {
            assert!(v.validate().is_ok(), "{} should be valid", v.name());
            let r = v.construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
            assert_eq!(sorted_ids(&r), vec![1, 2, 3, 4], "{}", v.name());
            assert_eq!(r.metrics, evaluate(&nodes[0], 0, r.tour.nodes(), &dm));
        }
    }

    #[test]
    fn test_every_variant_handles_empty_set() {
        let (nodes, dm) = setup();
        let variants: Vec<Construction> = vec![
            GreedyConstructor::new(0.5, 0.5).into(),
            MultiStartBiasedSearch::new(0.5).with_max_iterations(3).into(),
            RandomSearch::new(3).into(),
            TwoOpt::new().into(),
            ParticleSwarm::default().with_iterations(3, 1).into(),
            HybridTabuAnnealing::default().with_iterations(10).into(),
        ];
        let mut rng = u_numflow::random::create_rng(7);
        for v in &variants {
            let r = v.construct(&nodes[0], 12, &[], &dm, &mut rng);
            assert!(r.tour.is_empty());
            assert_eq!(r.metrics, SolutionMetrics::new(12, 0));
        }
    }

    #[test]
    fn test_names_are_distinct() {
        let names = [
            Construction::from(GreedyConstructor::default()).name().to_string(),
            Construction::from(MultiStartBiasedSearch::default()).name().to_string(),
            Construction::from(RandomSearch::default()).name().to_string(),
            Construction::from(TwoOpt::default()).name().to_string(),
            Construction::from(ParticleSwarm::default()).name().to_string(),
            Construction::from(HybridTabuAnnealing::default()).name().to_string(),
        ];
        for i in 0..names.len() {
            for j in i + 1..names.len() {
                assert_ne!(names[i], names[j]);
            }
        }
    }

    #[test]
    fn test_invalid_variant_is_reported() {
        let v = Construction::from(GreedyConstructor::new(1.5, 0.0));
        assert!(v.validate().is_err());
        let v = Construction::from(ParticleSwarm::default().with_particles(0));
        assert!(v.validate().is_err());
        let v = Construction::from(HybridTabuAnnealing::default().with_perturbation(2.0, 0.1));
        assert!(v.validate().is_err());
    }
}
