//! Travel time matrices.
//!
//! Provides a dense integer distance matrix indexed by node id.

mod matrix;

pub use matrix::DistanceMatrix;
