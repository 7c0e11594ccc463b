//! Discrete particle swarm over visiting orders.
//!
//! # Algorithm
//!
//! Every particle remembers three orders: the deterministic greedy order,
//! its current intention and its personal best. A move builds a new order
//! node by node. The candidates for the next node are the successors of
//! the last placed node in the greedy order, the intention, the personal
//! best and the swarm's best, skipping nodes already placed; at the first
//! step they are the first nodes of those orders. Candidates are ranked by
//! arrival score and one is drawn with [`biased_index`]. When every
//! successor is already placed, a random remaining node is taken.
//!
//! After a move the intention becomes a shuffled copy of the new order.
//! With probability `deep_search` the new order is first improved by
//! [`two_opt_improve`](crate::local_search::two_opt_improve).
//!
//! The swarm best starts as the incoming order and the search stops after
//! `max_iterations` rounds or `max_no_improve` rounds without improvement.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Result, TsptwError};
use crate::evaluation::{arrival_score, evaluate, TimeCursor};
use crate::local_search::two_opt_improve;
use crate::models::Node;

use super::algorithm::{ConstructionAlgorithm, ConstructionResult};
use super::greedy::{biased_index, pure_greedy};

/// Particle swarm search guided by greedy, personal and swarm bests.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
/// use u_tsptw::constructive::{ConstructionAlgorithm, ParticleSwarm};
///
/// let tw = TimeWindow::new(0, 1000).unwrap();
/// let nodes: Vec<Node> = (0..6).map(|i| Node::new(i, i as f64 * 10.0, 0.0, tw)).collect();
/// let dm = DistanceMatrix::from_nodes(&nodes);
///
/// let swarm = ParticleSwarm::default().with_iterations(100, 20);
/// let mut rng = u_numflow::random::create_rng(42);
/// let input: Vec<Node> = nodes[1..].iter().rev().copied().collect();
/// let result = swarm.construct(&nodes[0], 0, &input, &dm, &mut rng);
/// assert_eq!(result.tour.len(), 5);
/// // Never worse than the incoming order (cost 90).
/// assert!(result.cost() <= 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSwarm {
    /// Number of particles.
    pub particles: usize,
    /// Bias strength of the successor pick, in `(0, 1)`.
    pub alpha: f64,
    /// Probability of a 2-opt descent after a move.
    pub deep_search: f64,
    /// Maximum number of swarm rounds.
    pub max_iterations: usize,
    /// Rounds without improvement before stopping.
    pub max_no_improve: usize,
}

impl ParticleSwarm {
    pub fn with_particles(mut self, n: usize) -> Self {
        self.particles = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_deep_search(mut self, probability: f64) -> Self {
        self.deep_search = probability;
        self
    }

    pub fn with_iterations(mut self, max_iterations: usize, max_no_improve: usize) -> Self {
        self.max_iterations = max_iterations;
        self.max_no_improve = max_no_improve;
        self
    }
}

impl Default for ParticleSwarm {
    fn default() -> Self {
        Self {
            particles: 30,
            alpha: 0.9,
            deep_search: 0.02,
            max_iterations: 3000,
            max_no_improve: 1000,
        }
    }
}

impl ConstructionAlgorithm for ParticleSwarm {
    fn name(&self) -> &str {
        "particle_swarm"
    }

    fn validate(&self) -> Result<()> {
        if self.particles == 0 {
            return Err(TsptwError::InvalidConfig(
                "swarm needs at least 1 particle".into(),
            ));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(TsptwError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.deep_search) {
            return Err(TsptwError::InvalidConfig(format!(
                "deep_search must be in [0, 1], got {}",
                self.deep_search
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
        if nodes.len() < 2 {
            return ConstructionResult::evaluated(start, start_value, nodes.to_vec(), distances);
        }
        let leaf = Leaf {
            start,
            start_value,
            nodes,
            distances,
            local: nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect(),
        };
        let greedy = leaf.locals(pure_greedy(start, start_value, nodes, distances).tour.nodes());

        let mut swarm: Vec<Particle> = (0..self.particles)
            .map(|_| Particle::new(&leaf, greedy.clone(), rng))
            .collect();

        let mut best: Vec<usize> = (0..nodes.len()).collect();
        let mut best_cost = leaf.cost(&best);
        let mut no_improve = 0;

        for iter in 0..self.max_iterations {
            let guide = Guide::new(best.clone());
            let mut round: Option<(&Guide, i64)> = None;
            for particle in &mut swarm {
                particle.advance(&leaf, &guide, self.alpha, self.deep_search, rng);
            }
            for particle in &swarm {
                if round.map_or(true, |(_, c)| particle.pbest_cost < c) {
                    round = Some((&particle.pbest, particle.pbest_cost));
                }
            }

            match round {
                Some((pbest, cost)) if cost < best_cost => {
                    log::trace!("particle swarm: round {iter} improved {best_cost} -> {cost}");
                    best = pbest.order.clone();
                    best_cost = cost;
                    no_improve = 0;
                }
                _ => {
                    no_improve += 1;
                    if no_improve > self.max_no_improve {
                        break;
                    }
                }
            }
        }

        ConstructionResult::evaluated(start, start_value, leaf.order(&best), distances)
    }
}

/// Node set of one construction call, addressed by local index.
struct Leaf<'a> {
    start: &'a Node,
    start_value: i64,
    nodes: &'a [Node],
    distances: &'a DistanceMatrix,
    local: HashMap<usize, usize>,
}

impl Leaf<'_> {
    fn locals(&self, order: &[Node]) -> Vec<usize> {
        order
            .iter()
            .filter_map(|n| self.local.get(&n.id()).copied())
            .collect()
    }

    fn order(&self, locals: &[usize]) -> Vec<Node> {
        locals.iter().map(|&i| self.nodes[i]).collect()
    }

    fn cost(&self, locals: &[usize]) -> i64 {
        evaluate(self.start, self.start_value, &self.order(locals), self.distances).cost()
    }
}

/// An order of local indices with its inverse.
#[derive(Debug, Clone)]
struct Guide {
    order: Vec<usize>,
    position: Vec<usize>,
}

impl Guide {
    fn new(order: Vec<usize>) -> Self {
        let mut position = vec![0; order.len()];
        for (pos, &i) in order.iter().enumerate() {
            position[i] = pos;
        }
        Self { order, position }
    }

    fn first(&self) -> usize {
        self.order[0]
    }

    fn successor(&self, i: usize) -> Option<usize> {
        self.order.get(self.position[i] + 1).copied()
    }
}

struct Particle {
    greedy: Guide,
    intention: Guide,
    pbest: Guide,
    pbest_cost: i64,
}

impl Particle {
    fn new<R: Rng>(leaf: &Leaf<'_>, greedy: Vec<usize>, rng: &mut R) -> Self {
        let mut pbest: Vec<usize> = (0..leaf.nodes.len()).collect();
        u_numflow::random::shuffle(&mut pbest, rng);
        let mut intention: Vec<usize> = (0..leaf.nodes.len()).collect();
        u_numflow::random::shuffle(&mut intention, rng);
        Self {
            greedy: Guide::new(greedy),
            intention: Guide::new(intention),
            pbest_cost: leaf.cost(&pbest),
            pbest: Guide::new(pbest),
        }
    }

    /// Builds a new order and folds it into the personal best.
    fn advance<R: Rng>(
        &mut self,
        leaf: &Leaf<'_>,
        best: &Guide,
        alpha: f64,
        deep_search: f64,
        rng: &mut R,
    ) {
        let n = leaf.nodes.len();
        let guides = [&self.greedy, &self.intention, &self.pbest, best];
        let mut used = vec![false; n];
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut current: Vec<usize> = Vec::with_capacity(n);
        let mut cursor = TimeCursor::new(*leaf.start, leaf.start_value);

        while current.len() < n {
            let mut options: Vec<usize> = match current.last() {
                None => guides.iter().map(|g| g.first()).collect(),
                Some(&last) => guides
                    .iter()
                    .filter_map(|g| g.successor(last))
                    .filter(|&i| !used[i])
                    .collect(),
            };

            let next = if options.is_empty() {
                remaining[rng.random_range(0..remaining.len())]
            } else {
                let at = *cursor.node();
                let now = cursor.time();
                options.sort_by_cached_key(|&i| {
                    arrival_score(&at, now, &leaf.nodes[i], leaf.distances)
                });
                options[biased_index(options.len(), alpha, rng)]
            };

            used[next] = true;
            remaining.retain(|&i| i != next);
            cursor.advance(&leaf.nodes[next], leaf.distances);
            current.push(next);
        }

        let mut intention = current.clone();
        u_numflow::random::shuffle(&mut intention, rng);
        self.intention = Guide::new(intention);

        let cost = if rng.random::<f64>() < deep_search {
            let mut order = leaf.order(&current);
            let metrics = two_opt_improve(leaf.start, leaf.start_value, &mut order, leaf.distances);
            current = leaf.locals(&order);
            metrics.cost()
        } else {
            cursor.metrics().cost()
        };

        if cost < self.pbest_cost {
            self.pbest = Guide::new(current);
            self.pbest_cost = cost;
        }
    }
}
