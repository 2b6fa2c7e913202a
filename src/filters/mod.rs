//! Smoothing filters
//!
//! - [`Ema`]: exponential moving average
//! - [`LowPass`]: first-order low-pass, tuned separately from the EMA
//!
//! The simple moving average needs no state of its own: it is the window
//! mean from [`statistics`](crate::statistics).
//!
//! # Example
//!
//! ```
//! use flowsignal::filters::Ema;
//! use flowsignal::traits::Smoother;
//!
//! let mut ema = Ema::new(0.2);
//! for reading in [10.0, 10.5, 9.8, 10.1] {
//!     ema.apply(reading);
//! }
//! println!("smoothed: {}", ema.value());
//! ```

mod first_order;

pub use first_order::{Ema, FirstOrder, LowPass};
