//! # u-tsptw
//!
//! Travelling salesman with time windows (TSPTW). Builds a single visiting
//! order that minimises final arrival time plus total lateness.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, TimeWindow, Tour, SolutionMetrics)
//! - [`distance`] — Integer travel-time matrix
//! - [`evaluation`] — Arrival-time simulation and greedy arrival score
//! - [`constructive`] — Biased-randomised greedy, multi-start, random search, particle swarm
//! - [`local_search`] — 2-opt descent on the time-window objective
//! - [`hybrid`] — Tabu lateness repair followed by simulated annealing
//! - [`partition`] — Divide-and-conquer solver splitting on time-window pivots
//! - [`error`] — Input validation errors

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod hybrid;
pub mod local_search;
pub mod models;
pub mod partition;

pub use error::{Result, TsptwError};
