//! Node and time window types.

use serde::{Deserialize, Serialize};

/// The interval during which a visit to a node is on time.
///
/// Arriving before `open` means waiting until `open`; arriving after
/// `close` is allowed but accrues lateness.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(100, 200).unwrap();
/// assert_eq!(tw.lateness(230), 30);
/// assert_eq!(tw.start_of_service(40), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    open: i64,
    close: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `open > close`.
    pub fn new(open: i64, close: i64) -> Option<Self> {
        if open > close {
            return None;
        }
        Some(Self { open, close })
    }

    /// Earliest on-time visit.
    pub fn open(&self) -> i64 {
        self.open
    }

    /// Latest on-time visit.
    pub fn close(&self) -> i64 {
        self.close
    }

    /// Time at which the visit takes place when arriving at `arrival`.
    pub fn start_of_service(&self, arrival: i64) -> i64 {
        arrival.max(self.open)
    }

    /// Positive lateness of a visit at `time`, zero if on time or early.
    pub fn lateness(&self, time: i64) -> i64 {
        (time - self.close).max(0)
    }
}

/// A location to visit within a time window.
///
/// Ids are expected to be dense (`0..N`) so that they index directly
/// into a [`DistanceMatrix`](crate::distance::DistanceMatrix).
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
///
/// let n = Node::new(3, 10.0, 4.0, TimeWindow::new(0, 50).unwrap());
/// assert_eq!(n.id(), 3);
/// assert_eq!(n.open(), 0);
/// assert_eq!(n.close(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    window: TimeWindow,
}

impl Node {
    /// Creates a new node.
    pub fn new(id: usize, x: f64, y: f64, window: TimeWindow) -> Self {
        Self { id, x, y, window }
    }

    /// Node id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Time window of this node.
    pub fn time_window(&self) -> &TimeWindow {
        &self.window
    }

    /// Opening time of the window.
    pub fn open(&self) -> i64 {
        self.window.open
    }

    /// Closing time of the window.
    pub fn close(&self) -> i64 {
        self.window.close
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.open(), 10);
        assert_eq!(tw.close(), 20);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
    }

    #[test]
    fn test_time_window_degenerate() {
        let tw = TimeWindow::new(5, 5).expect("valid");
        assert_eq!(tw.start_of_service(5), 5);
        assert_eq!(tw.lateness(5), 0);
        assert_eq!(tw.lateness(6), 1);
    }

    #[test]
    fn test_start_of_service() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.start_of_service(3), 10);
        assert_eq!(tw.start_of_service(12), 12);
        assert_eq!(tw.start_of_service(25), 25);
    }

    #[test]
    fn test_lateness() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.lateness(5), 0);
        assert_eq!(tw.lateness(20), 0);
        assert_eq!(tw.lateness(27), 7);
    }

    #[test]
    fn test_node_accessors() {
        let n = Node::new(1, 3.0, 4.0, TimeWindow::new(2, 9).expect("valid"));
        assert_eq!(n.id(), 1);
        assert_eq!(n.x(), 3.0);
        assert_eq!(n.y(), 4.0);
        assert_eq!(n.open(), 2);
        assert_eq!(n.close(), 9);
        assert_eq!(n.time_window().close(), 9);
    }

    #[test]
    fn test_node_distance() {
        let tw = TimeWindow::new(0, 0).expect("valid");
        let a = Node::new(0, 0.0, 0.0, tw);
        let b = Node::new(1, 3.0, 4.0, tw);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_node_serde() {
        let n = Node::new(4, 1.5, 2.5, TimeWindow::new(0, 100).expect("valid"));
        let json = serde_json::to_string(&n).expect("serialize");
        let back: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, n);
    }
}
