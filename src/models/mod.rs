//! Domain model types for time-windowed visiting sequences.
//!
//! Provides nodes with time windows, tours as ordered sequences of
//! visits, and the `(value, delay)` metrics used to score them.

mod node;
mod solution;
mod tour;

pub use node::{Node, TimeWindow};
pub use solution::SolutionMetrics;
pub use tour::Tour;
