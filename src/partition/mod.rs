//! Time-window partitioning.
//!
//! - [`PartitionSolver`] — Splits the node set around random pivots and
//!   solves the parts in order with a construction heuristic
//! - [`PartitionConfig`] — Leaf size, split attempts, start time, return leg

mod config;
mod solver;

pub use config::PartitionConfig;
pub use solver::{PartitionSolution, PartitionSolver, PartitionStats};
