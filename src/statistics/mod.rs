//! Statistical summaries over the sliding window
//!
//! Sums and sums of squares are maintained incrementally in `f64`, giving
//! O(1) mean and variance per sample. Extrema are cached and rescanned
//! lazily after an eviction removes one of them.
//!
//! # Example
//!
//! ```
//! use flowsignal::statistics::WindowMoments;
//!
//! let mut moments = WindowMoments::<f32>::new();
//!
//! for (i, value) in [1.0, 2.0, 3.0].into_iter().enumerate() {
//!     moments.record(value, None, i + 1);
//! }
//!
//! println!("Mean: {}", moments.mean(3));
//! println!("Stddev: {}", moments.stddev(3));
//! ```

mod moments;

pub use moments::WindowMoments;
