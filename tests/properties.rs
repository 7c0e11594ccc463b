use proptest::prelude::*;

use u_tsptw::constructive::{ConstructionAlgorithm, GreedyConstructor};
use u_tsptw::distance::DistanceMatrix;
use u_tsptw::evaluation::evaluate;
use u_tsptw::models::{Node, TimeWindow};
use u_tsptw::partition::{PartitionConfig, PartitionSolver};

/// Instance of nodes with ids `0..n`; node 0 is the start.
fn instance() -> impl Strategy<Value = (Vec<Node>, DistanceMatrix)> {
    prop::collection::vec((0.0f64..100.0, 0.0f64..100.0, 0i64..500, 0i64..200), 1..40).prop_map(
        |raw| {
            let nodes: Vec<Node> = raw
                .into_iter()
                .enumerate()
                .map(|(id, (x, y, open, width))| {
                    let window = TimeWindow::new(open, open + width).expect("open <= close");
                    Node::new(id, x, y, window)
                })
                .collect();
            let dm = DistanceMatrix::from_nodes(&nodes);
            (nodes, dm)
        },
    )
}

fn sorted_ids(nodes: &[Node]) -> Vec<usize> {
    let mut ids: Vec<usize> = nodes.iter().map(|n| n.id()).collect();
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn greedy_visits_every_node_once(
        (nodes, dm) in instance(),
        alpha in 0.01f64..0.99,
        beta in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = u_numflow::random::create_rng(seed);
        let result = GreedyConstructor::new(alpha, beta)
            .construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
        prop_assert_eq!(sorted_ids(result.tour.nodes()), sorted_ids(&nodes[1..]));
        prop_assert_eq!(result.metrics, evaluate(&nodes[0], 0, result.tour.nodes(), &dm));
    }

    #[test]
    fn full_prefix_keeps_input_order(
        (nodes, dm) in instance(),
        seed in any::<u64>(),
    ) {
        let mut rng = u_numflow::random::create_rng(seed);
        let result = GreedyConstructor::new(0.5, 1.0)
            .construct(&nodes[0], 0, &nodes[1..], &dm, &mut rng);
        prop_assert_eq!(result.tour.nodes(), &nodes[1..]);
    }

    #[test]
    fn evaluation_never_runs_backwards(
        (nodes, dm) in instance(),
        start_value in 0i64..1000,
    ) {
        let m = evaluate(&nodes[0], start_value, &nodes[1..], &dm);
        prop_assert!(m.value >= start_value);
        prop_assert!(m.delay >= 0);
        prop_assert_eq!(m, evaluate(&nodes[0], start_value, &nodes[1..], &dm));
    }

    #[test]
    fn partition_visits_every_node_once(
        (nodes, dm) in instance(),
        p in 1usize..10,
        seed in any::<u64>(),
    ) {
        let solver = PartitionSolver::new(
            GreedyConstructor::new(0.9, 0.0),
            PartitionConfig::default().with_p(p),
        );
        let mut rng = u_numflow::random::create_rng(seed);
        let solution = solver
            .solve(&nodes[0], &nodes[1..], &dm, &mut rng)
            .expect("generated input is valid");
        prop_assert_eq!(sorted_ids(solution.tour.nodes()), sorted_ids(&nodes[1..]));
        prop_assert_eq!(
            solution.metrics,
            evaluate(&nodes[0], 0, solution.tour.nodes(), &dm)
        );
        prop_assert_eq!(solution.stats.accepted_splits + 1, solution.stats.leaves);
    }
}
