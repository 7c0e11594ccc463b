//! Construction heuristics for building visiting orders.
//!
//! - [`ConstructionAlgorithm`] — Common entry point shared by every heuristic
//! - [`GreedyConstructor`] — Biased-randomised greedy on arrival score, O(n² log n)
//! - [`MultiStartBiasedSearch`] — Adaptive multi-start over the greedy pass
//! - [`RandomSearch`] — Best of repeated random shuffles
//! - [`ParticleSwarm`] — Discrete particle swarm guided by greedy and best orders
//! - [`Construction`] — Tagged union of all variants (including
//!   [`TwoOpt`](crate::local_search::TwoOpt) and
//!   [`HybridTabuAnnealing`](crate::hybrid::HybridTabuAnnealing))

mod algorithm;
mod greedy;
mod multi_start;
mod particle_swarm;
mod random_search;

pub use algorithm::{Construction, ConstructionAlgorithm, ConstructionResult};
pub use greedy::{biased_index, GreedyConstructor};
pub use multi_start::MultiStartBiasedSearch;
pub use particle_swarm::ParticleSwarm;
pub use random_search::RandomSearch;
