//! Tour type.

use super::Node;

/// An ordered sequence of node visits.
///
/// The start node is not stored; a tour lists only the nodes visited
/// after it. Whenever a tour is handed back by an algorithm it is a
/// permutation of the node set it was built from.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow, Tour};
///
/// let tw = TimeWindow::new(0, 10).unwrap();
/// let mut tour = Tour::new();
/// tour.push(Node::new(2, 0.0, 0.0, tw));
/// tour.push(Node::new(1, 1.0, 0.0, tw));
/// assert_eq!(tour.ids(), vec![2, 1]);
/// assert_eq!(tour.last().map(|n| n.id()), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tour {
    nodes: Vec<Node>,
}

impl Tour {
    /// Creates an empty tour.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an empty tour with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends all nodes of another tour, preserving their order.
    pub fn extend(&mut self, other: Tour) {
        self.nodes.extend(other.nodes);
    }

    /// Visited nodes in order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node ids in visit order.
    pub fn ids(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.id()).collect()
    }

    /// The last visited node, if any.
    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tour has no visits.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<Vec<Node>> for Tour {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}
