//! # Flowsignal
//!
//! Fixed-capacity, allocation-free streaming statistics and filtering for
//! embedded signals.
//!
//! Flowsignal keeps the last `N` samples of a sensor or ADC channel in a ring
//! buffer and maintains, in O(1) per sample, the statistics and filters that
//! firmware typically needs to drive calibration, fault detection or
//! orientation estimation.
//!
//! ## Features
//!
//! - **Windowed Statistics**: mean, sample variance, standard deviation,
//!   coefficient of variation, min, max, range
//! - **Filters**: EMA, SMA and a first-order low-pass
//! - **Rate**: raw and smoothed derivative, trapezoidal integral, driven by
//!   millisecond timestamps with a minimum-period gate
//! - **Checks**: sigma-based outlier test and stability test
//! - **No Allocation**: storage is a `[T; N]` sized at compile time
//!
//! ## Quick Start
//!
//! ```rust
//! use flowsignal::prelude::*;
//!
//! let mut temperature = SignalProcessor::<i16, 32>::new();
//! for reading in [215, 216, 214, 215, 217] {
//!     temperature.add(reading);
//! }
//!
//! println!("mean: {}", temperature.mean());
//! println!("stddev: {}", temperature.stddev());
//! assert!(temperature.is_outlier(300));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): use `std` float intrinsics and implement
//!   `std::error::Error`; without it the crate is `no_std` and uses `libm`
//! - `serde`: serialize [`SignalConfig`] and [`SignalSnapshot`]
//! - `tracing`: emit `tracing` events on cold paths (resets, clamped
//!   coefficients, extrema rescans)

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod math;

pub mod config;
pub mod filters;
pub mod processor;
pub mod rate;
pub mod statistics;
pub mod traits;
pub mod window;

pub mod prelude {
    pub use crate::config::SignalConfig;
    pub use crate::processor::{SignalProcessor, SignalSnapshot};
    pub use crate::traits::*;
}

pub use config::{ConfigError, SignalConfig};
pub use processor::{SignalProcessor, SignalSnapshot, DEFAULT_SIGMA_THRESHOLD};
