//! Solution metrics.

use serde::{Deserialize, Serialize};

/// Simulated finishing time and cumulative lateness of a visiting order.
///
/// `value` is the clock after the last visit, waiting included. `delay`
/// sums the lateness of every visit past its closing time.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::SolutionMetrics;
///
/// let m = SolutionMetrics::new(120, 15);
/// assert_eq!(m.cost(), 135);
/// assert!(!m.is_on_time());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SolutionMetrics {
    /// Clock time after the most recent visit.
    pub value: i64,
    /// Summed lateness across all visits.
    pub delay: i64,
}

impl SolutionMetrics {
    /// Creates a metrics pair.
    pub fn new(value: i64, delay: i64) -> Self {
        Self { value, delay }
    }

    /// Penalized objective: `value + delay`.
    pub fn cost(&self) -> i64 {
        self.value + self.delay
    }

    /// Returns `true` if no visit was late.
    pub fn is_on_time(&self) -> bool {
        self.delay == 0
    }
}
