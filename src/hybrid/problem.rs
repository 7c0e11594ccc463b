//! Bridges to the tabu search and simulated annealing runners.
//!
//! - [`RepairProblem`] — [`TabuProblem`] minimising total lateness only
//! - [`AnnealingProblem`] — [`SaProblem`] minimising `value + delay`

use rand::Rng;
use u_metaheur::sa::SaProblem;
use u_metaheur::tabu::{TabuMove, TabuProblem};

use crate::distance::DistanceMatrix;
use crate::evaluation::evaluate;
use crate::models::{Node, SolutionMetrics};

use super::moves::{perturb, random_move, timing};

/// Start node, clock and travel times shared by both phases.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LeafContext<'a> {
    pub start: &'a Node,
    pub start_value: i64,
    pub distances: &'a DistanceMatrix,
}

impl LeafContext<'_> {
    pub(crate) fn metrics(&self, order: &[Node]) -> SolutionMetrics {
        evaluate(self.start, self.start_value, order, self.distances)
    }
}

/// Tabu search over shift/reverse/swap moves that drives lateness down.
pub(crate) struct RepairProblem<'a> {
    pub context: LeafContext<'a>,
    pub initial: Vec<Node>,
    pub neighborhood_size: usize,
}

impl TabuProblem for RepairProblem<'_> {
    type Solution = Vec<Node>;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<Node> {
        self.initial.clone()
    }

    fn cost(&self, order: &Vec<Node>) -> f64 {
        self.context.metrics(order).delay as f64
    }

    fn neighbors<R: Rng>(&self, order: &Vec<Node>, rng: &mut R) -> Vec<TabuMove<Vec<Node>>> {
        let ctx = &self.context;
        let timing = timing(ctx.start, ctx.start_value, order, ctx.distances);
        (0..self.neighborhood_size)
            .filter_map(|_| random_move(order, &timing, rng))
            .map(|m| TabuMove {
                cost: self.cost(&m.order),
                key: m.key,
                solution: m.order,
            })
            .collect()
    }
}

/// Simulated annealing on `value + delay` with occasional perturbation.
pub(crate) struct AnnealingProblem<'a> {
    pub context: LeafContext<'a>,
    pub initial: Vec<Node>,
    /// Probability of perturbing a neighbour.
    pub perturbation: f64,
    /// Fraction of nodes relocated by one perturbation.
    pub perturbed: f64,
}

impl SaProblem for AnnealingProblem<'_> {
    type Solution = Vec<Node>;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Vec<Node> {
        self.initial.clone()
    }

    fn cost(&self, order: &Vec<Node>) -> f64 {
        self.context.metrics(order).cost() as f64
    }

    fn neighbor<R: Rng>(&self, order: &Vec<Node>, rng: &mut R) -> Vec<Node> {
        let ctx = &self.context;
        let timing = timing(ctx.start, ctx.start_value, order, ctx.distances);
        let mut next = random_move(order, &timing, rng).map_or_else(|| order.clone(), |m| m.order);
        if rng.random::<f64>() < self.perturbation {
            let count = (next.len() as f64 * self.perturbed) as usize;
            perturb(&mut next, count, rng);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;
    use u_metaheur::sa::{CoolingSchedule, SaConfig, SaRunner};
    use u_metaheur::tabu::{TabuConfig, TabuRunner};

    /// Deadlines listed in reverse of the travel order along a line.
    fn reversed_deadlines() -> (Vec<Node>, DistanceMatrix) {
        let windows = [(0, 1000), (0, 12), (0, 25), (0, 35), (0, 45), (0, 60)];
        let nodes: Vec<Node> = windows
            .iter()
            .enumerate()
            .map(|(i, &(o, c))| Node::new(i, i as f64 * 10.0, 0.0, TimeWindow::new(o, c).expect("valid")))
            .collect();
        let dm = DistanceMatrix::from_nodes(&nodes);
        (nodes, dm)
    }

    #[test]
    fn test_repair_never_increases_delay() {
        let (nodes, dm) = reversed_deadlines();
        let context = LeafContext {
            start: &nodes[0],
            start_value: 0,
            distances: &dm,
        };
        let initial: Vec<Node> = nodes[1..].iter().rev().copied().collect();
        let before = context.metrics(&initial).delay;
        assert!(before > 0);

        let problem = RepairProblem {
            context,
            initial,
            neighborhood_size: 20,
        };
        let config = TabuConfig::default()
            .with_max_iterations(200)
            .with_tabu_tenure(10)
            .with_seed(42);
        let result = TabuRunner::run(&problem, &config);
        assert!(result.best_cost <= before as f64);
        assert_eq!(context.metrics(&result.best).delay as f64, result.best_cost);
        assert_eq!(result.best.len(), 5);
    }

    #[test]
    fn test_annealing_cost_matches_metrics() {
        let (nodes, dm) = reversed_deadlines();
        let context = LeafContext {
            start: &nodes[0],
            start_value: 5,
            distances: &dm,
        };
        let problem = AnnealingProblem {
            context,
            initial: nodes[1..].to_vec(),
            perturbation: 0.2,
            perturbed: 0.4,
        };
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.1)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
            .with_iterations_per_temperature(20)
            .with_seed(42);
        let result = SaRunner::run(&problem, &config);
        let m = context.metrics(&result.best);
        assert_eq!(m.cost() as f64, result.best_cost);
        assert!(result.best_cost <= problem.cost(&problem.initial));
    }

    #[test]
    fn test_neighbors_respect_size() {
        let (nodes, dm) = reversed_deadlines();
        let problem = RepairProblem {
            context: LeafContext {
                start: &nodes[0],
                start_value: 0,
                distances: &dm,
            },
            initial: nodes[1..].to_vec(),
            neighborhood_size: 7,
        };
        let mut rng = u_numflow::random::create_rng(42);
        let moves = problem.neighbors(&problem.initial, &mut rng);
        assert_eq!(moves.len(), 7);
        for m in &moves {
            assert_eq!(m.cost, problem.cost(&m.solution));
        }
    }
}
