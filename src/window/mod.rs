//! Sliding-window storage
//!
//! The window keeps the last `N` samples in a fixed-size array and reports
//! which sample each write evicted, so downstream accumulators can retract
//! its contribution.

mod ring;

pub use ring::RingBuffer;
