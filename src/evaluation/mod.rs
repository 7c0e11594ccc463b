//! Scoring of visiting orders against time windows.

mod evaluator;

pub use evaluator::{arrival_score, evaluate, return_leg, TimeCursor};
