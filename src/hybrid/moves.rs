//! Neighbourhood moves on visiting orders.
//!
//! - **Shift left**: a late node moves to an earlier position
//! - **Shift right**: a node reached before it opens moves to a later position
//! - **Reverse**: a segment of at least two nodes is reversed
//! - **Swap**: two nodes exchange positions
//!
//! Every move carries a key naming the move family and the node ids it
//! touched, used for tabu tracking.

use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::evaluation::TimeCursor;
use crate::models::Node;

/// Move families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveKind {
    ShiftLeft,
    ShiftRight,
    Reverse,
    Swap,
}

impl MoveKind {
    pub(crate) const ALL: [MoveKind; 4] = [
        MoveKind::ShiftLeft,
        MoveKind::ShiftRight,
        MoveKind::Reverse,
        MoveKind::Swap,
    ];
}

/// An order produced by one move and the key identifying that move.
#[derive(Debug, Clone)]
pub(crate) struct Moved {
    pub order: Vec<Node>,
    pub key: String,
}

/// Positions reached before opening (`waiting`) and after closing (`late`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Timing {
    pub waiting: Vec<usize>,
    pub late: Vec<usize>,
}

/// Simulates `order` and classifies each position.
pub(crate) fn timing(
    start: &Node,
    start_value: i64,
    order: &[Node],
    distances: &DistanceMatrix,
) -> Timing {
    let mut cursor = TimeCursor::new(*start, start_value);
    let mut timing = Timing::default();
    for (pos, node) in order.iter().enumerate() {
        let arrival = cursor.time() + distances.get(cursor.node().id(), node.id());
        if arrival < node.open() {
            timing.waiting.push(pos);
        }
        cursor.advance(node, distances);
        if cursor.time() > node.close() {
            timing.late.push(pos);
        }
    }
    timing
}

/// Applies one move of the given family; `None` if the family has no candidate.
pub(crate) fn apply<R: Rng>(
    kind: MoveKind,
    order: &[Node],
    timing: &Timing,
    rng: &mut R,
) -> Option<Moved> {
    let n = order.len();
    if n < 2 {
        return None;
    }
    let mut next = order.to_vec();
    let key = match kind {
        MoveKind::ShiftLeft => {
            let movable: Vec<usize> = timing.late.iter().copied().filter(|&p| p > 0).collect();
            let from = pick(&movable, rng)?;
            let to = rng.random_range(0..from);
            let node = next.remove(from);
            next.insert(to, node);
            format!("shift_left:{}:{}", node.id(), order[to].id())
        }
        MoveKind::ShiftRight => {
            let movable: Vec<usize> =
                timing.waiting.iter().copied().filter(|&p| p + 1 < n).collect();
            let from = pick(&movable, rng)?;
            let to = rng.random_range(from + 1..n);
            let node = next.remove(from);
            next.insert(to, node);
            format!("shift_right:{}:{}", node.id(), order[to].id())
        }
        MoveKind::Reverse => {
            let a = rng.random_range(0..n - 1);
            let b = rng.random_range(a + 2..=n);
            next[a..b].reverse();
            format!("reverse:{}:{}", order[a].id(), order[b - 1].id())
        }
        MoveKind::Swap => {
            let a = rng.random_range(0..n);
            let mut b = rng.random_range(0..n - 1);
            if b >= a {
                b += 1;
            }
            next.swap(a, b);
            let (lo, hi) = ordered(order[a].id(), order[b].id());
            format!("swap:{lo}:{hi}")
        }
    };
    Some(Moved { order: next, key })
}

/// Applies a move of a uniformly drawn family, falling back to a swap.
pub(crate) fn random_move<R: Rng>(order: &[Node], timing: &Timing, rng: &mut R) -> Option<Moved> {
    let kind = MoveKind::ALL[rng.random_range(0..MoveKind::ALL.len())];
    apply(kind, order, timing, rng).or_else(|| apply(MoveKind::Swap, order, timing, rng))
}

/// Moves `count` randomly chosen nodes to random positions.
pub(crate) fn perturb<R: Rng>(order: &mut Vec<Node>, count: usize, rng: &mut R) {
    if order.len() < 2 {
        return;
    }
    for _ in 0..count {
        let node = order.remove(rng.random_range(0..order.len()));
        let to = rng.random_range(0..=order.len());
        order.insert(to, node);
    }
}

fn pick<R: Rng>(positions: &[usize], rng: &mut R) -> Option<usize> {
    if positions.is_empty() {
        None
    } else {
        Some(positions[rng.random_range(0..positions.len())])
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    /// Start at x = 0; nodes 1..=4 on a line, 10 apart.
    fn line(windows: &[(i64, i64)]) -> (Vec<Node>, DistanceMatrix) {
        let mut nodes = vec![Node::new(0, 0.0, 0.0, TimeWindow::new(0, 1000).expect("valid"))];
        for (i, &(o, c)) in windows.iter().enumerate() {
            let id = i + 1;
            nodes.push(Node::new(id, id as f64 * 10.0, 0.0, TimeWindow::new(o, c).expect("valid")));
        }
        let dm = DistanceMatrix::from_nodes(&nodes);
        (nodes, dm)
    }

    fn sorted_ids(order: &[Node]) -> Vec<usize> {
        let mut ids: Vec<usize> = order.iter().map(|n| n.id()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_timing_classifies_positions() {
        // Arrivals at 10, 20, 30, 40.
        let (nodes, dm) = line(&[(15, 100), (0, 100), (0, 25), (0, 35)]);
        let t = timing(&nodes[0], 0, &nodes[1..], &dm);
        assert_eq!(t.waiting, vec![0]);
        // Waiting at node 1 shifts later arrivals to 25, 35, 45.
        assert_eq!(t.late, vec![2, 3]);
    }

    #[test]
    fn test_shift_left_moves_late_node_earlier() {
        let (nodes, dm) = line(&[(0, 100), (0, 100), (0, 100), (0, 5)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        assert_eq!(t.late, vec![3]);
        let mut rng = u_numflow::random::create_rng(42);
        let m = apply(MoveKind::ShiftLeft, &order, &t, &mut rng).expect("late node exists");
        let pos = m.order.iter().position(|n| n.id() == 4).expect("present");
        assert!(pos < 3);
        assert!(m.key.starts_with("shift_left:4:"));
        assert_eq!(sorted_ids(&m.order), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_shift_right_moves_waiting_node_later() {
        let (nodes, dm) = line(&[(500, 600), (0, 1000), (0, 1000), (0, 1000)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        assert_eq!(t.waiting, vec![0]);
        let mut rng = u_numflow::random::create_rng(42);
        let m = apply(MoveKind::ShiftRight, &order, &t, &mut rng).expect("waiting node exists");
        let pos = m.order.iter().position(|n| n.id() == 1).expect("present");
        assert!(pos > 0);
        assert!(m.key.starts_with("shift_right:1:"));
    }

    #[test]
    fn test_shift_without_candidates() {
        let (nodes, dm) = line(&[(0, 1000), (0, 1000), (0, 1000)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        let mut rng = u_numflow::random::create_rng(42);
        assert!(apply(MoveKind::ShiftLeft, &order, &t, &mut rng).is_none());
        assert!(apply(MoveKind::ShiftRight, &order, &t, &mut rng).is_none());
        assert!(random_move(&order, &t, &mut rng).is_some());
    }

    #[test]
    fn test_every_move_is_permutation() {
        let (nodes, dm) = line(&[(40, 60), (0, 15), (0, 100), (90, 95), (0, 20)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        let mut rng = u_numflow::random::create_rng(3);
        for _ in 0..50 {
            for kind in MoveKind::ALL {
                if let Some(m) = apply(kind, &order, &t, &mut rng) {
                    assert_eq!(sorted_ids(&m.order), vec![1, 2, 3, 4, 5]);
                    assert_ne!(m.order, order, "{kind:?} must change the order");
                }
            }
        }
    }

    #[test]
    fn test_swap_key_is_symmetric() {
        let (nodes, dm) = line(&[(0, 100), (0, 100)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        let mut rng = u_numflow::random::create_rng(42);
        let m = apply(MoveKind::Swap, &order, &t, &mut rng).expect("two nodes");
        assert_eq!(m.key, "swap:1:2");
    }

    #[test]
    fn test_short_orders_have_no_moves() {
        let (nodes, dm) = line(&[(0, 100)]);
        let order = nodes[1..].to_vec();
        let t = timing(&nodes[0], 0, &order, &dm);
        let mut rng = u_numflow::random::create_rng(42);
        assert!(random_move(&order, &t, &mut rng).is_none());
        assert!(random_move(&[], &Timing::default(), &mut rng).is_none());
    }

    #[test]
    fn test_perturb_keeps_nodes() {
        let (nodes, _) = line(&[(0, 100), (0, 100), (0, 100), (0, 100)]);
        let mut order = nodes[1..].to_vec();
        let mut rng = u_numflow::random::create_rng(42);
        perturb(&mut order, 3, &mut rng);
        assert_eq!(sorted_ids(&order), vec![1, 2, 3, 4]);
    }
}
