//! Local search improvement of visiting orders.
//!
//! - [`two_opt_improve`] — Segment-reversal descent on `value + delay`
//! - [`TwoOpt`] — Construction variant: shuffle, then 2-opt descent

mod two_opt;

pub use two_opt::{two_opt_improve, TwoOpt};
