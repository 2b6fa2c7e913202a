//! Rate of change and accumulation
//!
//! [`RateTracker`] turns timestamped samples into a raw derivative, an
//! EMA-smoothed derivative and a trapezoidal integral. It is a small state
//! machine ([`RatePhase`]) so the idle-to-tracking transition and the reset
//! rules are explicit.

mod tracker;

pub use tracker::{RatePhase, RateTracker, DEFAULT_DERIVATIVE_ALPHA};
