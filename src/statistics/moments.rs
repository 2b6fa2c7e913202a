//! Windowed moments (sum, sum of squares, min, max)
//!
//! Unlike a cumulative accumulator, every statistic here covers only the
//! samples currently resident in the window. Evictions retract their
//! contribution before the new sample is added.
//!
//! # Lazy extrema
//!
//! Evicting the current minimum or maximum would require an O(N) scan to find
//! the replacement. Instead the cache is flagged stale and the scan runs on
//! the next `min()`/`max()`/`range()` query. The cache lives in a [`Cell`] so
//! those queries can refresh it through `&self`, which keeps the type `Send`
//! but **not `Sync`**.

use crate::math;
use crate::traits::Sample;
use core::cell::Cell;

/// Cached extrema over the resident window
#[derive(Clone, Copy, Debug, PartialEq)]
struct Extrema<T> {
    min: T,
    max: T,
    /// An eviction may have removed `min` or `max`; rescan before use
    stale: bool,
}

impl<T: Sample> Extrema<T> {
    fn zeroed() -> Self {
        Self {
            min: T::default(),
            max: T::default(),
            stale: false,
        }
    }

    fn scan(window: &[T]) -> Self {
        let mut iter = window.iter().copied();
        let Some(first) = iter.next() else {
            return Self::zeroed();
        };

        let (min, max) = iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        });

        Self {
            min,
            max,
            stale: false,
        }
    }
}

/// Running moments over a sliding window
///
/// The caller owns the window storage and hands each new sample together with
/// the sample it evicted (if any). Queries that may need a rescan take the
/// resident slice.
///
/// # Example
///
/// ```
/// use flowsignal::statistics::WindowMoments;
///
/// let mut moments = WindowMoments::<i32>::new();
/// moments.record(4, None, 1);
/// moments.record(8, None, 2);
///
/// assert_eq!(moments.mean(2), 6.0);
/// assert_eq!(moments.variance(2), 8.0);
/// assert_eq!(moments.min(&[4, 8]), 4);
/// ```
#[derive(Clone, Debug)]
pub struct WindowMoments<T: Sample> {
    /// Sum of resident samples
    sum: f64,
    /// Sum of squared resident samples
    sum_sq: f64,
    extrema: Cell<Extrema<T>>,
}

impl<T: Sample> Default for WindowMoments<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> WindowMoments<T> {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            sum_sq: 0.0,
            extrema: Cell::new(Extrema::zeroed()),
        }
    }

    /// Account for one write into the window
    ///
    /// `len` is the number of resident samples *after* the write.
    #[inline]
    pub fn record(&mut self, value: T, evicted: Option<T>, len: usize) {
        let extrema = self.extrema.get_mut();

        if let Some(old) = evicted {
            let x = old.to_f64();
            self.sum -= x;
            self.sum_sq -= x * x;

            if old == extrema.min || old == extrema.max {
                extrema.stale = true;
            }
        }

        let x = value.to_f64();
        self.sum += x;
        self.sum_sq += x * x;

        if len == 1 {
            *extrema = Extrema {
                min: value,
                max: value,
                stale: false,
            };
        } else if !extrema.stale {
            if value < extrema.min {
                extrema.min = value;
            }
            if value > extrema.max {
                extrema.max = value;
            }
        }
    }

    /// Sum of resident samples
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum of squared resident samples
    #[inline]
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_sq
    }

    /// Arithmetic mean, 0 for an empty window
    #[inline]
    pub fn mean(&self, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else {
            self.sum / len as f64
        }
    }

    /// Sample variance (Bessel's correction), 0 when `len <= 1`
    ///
    /// Uses the shifted-sum form `(Σx² − n·mean²) / (n − 1)`. Cancellation can
    /// push a near-constant window slightly below zero, so the result is
    /// clamped at 0.
    pub fn variance(&self, len: usize) -> f64 {
        if len <= 1 {
            return 0.0;
        }

        let n = len as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq - n * mean * mean) / (n - 1.0);
        if variance > 0.0 {
            variance
        } else {
            0.0
        }
    }

    /// Sample standard deviation
    #[inline]
    pub fn stddev(&self, len: usize) -> f64 {
        math::sqrt(self.variance(len))
    }

    /// Coefficient of variation in percent, 0 when the mean is 0
    pub fn coefficient_of_variation(&self, len: usize) -> f64 {
        let mean = self.mean(len);
        if mean == 0.0 {
            0.0
        } else {
            self.stddev(len) / mean * 100.0
        }
    }

    /// Whether the extrema cache needs a rescan
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.extrema.get().stale
    }

    /// Minimum resident sample, `T::default()` for an empty window
    pub fn min(&self, window: &[T]) -> T {
        self.fresh_extrema(window).min
    }

    /// Maximum resident sample, `T::default()` for an empty window
    pub fn max(&self, window: &[T]) -> T {
        self.fresh_extrema(window).max
    }

    /// `max - min`, computed in `f64` so integer samples cannot overflow
    pub fn range(&self, window: &[T]) -> f64 {
        let extrema = self.fresh_extrema(window);
        extrema.max.to_f64() - extrema.min.to_f64()
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.extrema.set(Extrema::zeroed());
    }

    fn fresh_extrema(&self, window: &[T]) -> Extrema<T> {
        let mut extrema = self.extrema.get();
        if window.is_empty() {
            return Extrema::zeroed();
        }
        if extrema.stale {
            trace_event!(len = window.len(), "rescanning window extrema");
            extrema = Extrema::scan(window);
            self.extrema.set(extrema);
        }
        extrema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed values through a tiny manual window of capacity `N`
    fn feed<const N: usize>(values: &[i32]) -> (WindowMoments<i32>, [i32; N], usize) {
        let mut moments = WindowMoments::new();
        let mut slots = [0i32; N];
        let mut len = 0;
        let mut head = 0;

        for &v in values {
            let evicted = if len == N {
                Some(slots[head])
            } else {
                len += 1;
                None
            };
            slots[head] = v;
            head = (head + 1) % N;
            moments.record(v, evicted, len);
        }

        (moments, slots, len)
    }

    #[test]
    fn test_basic() {
        let (m, slots, len) = feed::<8>(&[2, 4, 4, 4, 5, 5, 7, 9]);

        assert!((m.mean(len) - 5.0).abs() < 1e-12);
        // Sample variance = 32 / 7
        assert!((m.variance(len) - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(m.min(&slots[..len]), 2);
        assert_eq!(m.max(&slots[..len]), 9);
        assert_eq!(m.range(&slots[..len]), 7.0);
    }

    #[test]
    fn test_empty() {
        let m = WindowMoments::<i32>::new();

        assert_eq!(m.mean(0), 0.0);
        assert_eq!(m.variance(0), 0.0);
        assert_eq!(m.coefficient_of_variation(0), 0.0);
        assert_eq!(m.min(&[]), 0);
        assert_eq!(m.max(&[]), 0);
    }

    #[test]
    fn test_single_value() {
        let (m, _, len) = feed::<4>(&[42]);

        assert_eq!(m.mean(len), 42.0);
        assert_eq!(m.variance(len), 0.0);
        assert_eq!(m.stddev(len), 0.0);
    }

    #[test]
    fn test_eviction_retracts_sums() {
        let (m, _, len) = feed::<3>(&[100, 1, 2, 3]);

        assert_eq!(len, 3);
        assert_eq!(m.sum(), 6.0);
        assert_eq!(m.sum_of_squares(), 14.0);
    }

    #[test]
    fn test_evicting_extremum_marks_stale() {
        let (m, slots, len) = feed::<3>(&[9, 5, 6, 7]);

        assert!(m.is_stale());
        assert_eq!(m.max(&slots[..len]), 7);
        assert!(!m.is_stale());
        assert_eq!(m.min(&slots[..len]), 5);
    }

    #[test]
    fn test_evicting_interior_value_keeps_cache() {
        let (m, slots, len) = feed::<3>(&[5, 1, 9, 4]);

        assert!(!m.is_stale());
        assert_eq!(m.min(&slots[..len]), 1);
        assert_eq!(m.max(&slots[..len]), 9);
    }

    #[test]
    fn test_constant_variance_is_zero() {
        let mut m = WindowMoments::<f64>::new();
        let mut slots = [0.0f64; 4];
        let mut head = 0;
        let mut len = 0;
        for _ in 0..50 {
            let evicted = if len == 4 {
                Some(slots[head])
            } else {
                len += 1;
                None
            };
            slots[head] = 0.1;
            head = (head + 1) % 4;
            m.record(0.1, evicted, len);
        }

        assert!(m.variance(len) >= 0.0);
        assert!(!m.stddev(len).is_nan());
    }

    #[test]
    fn test_coefficient_of_variation() {
        let (m, _, len) = feed::<4>(&[2, 4, 4, 6]);

        // mean 4, sample stddev sqrt(8/3)
        let expected = (8.0f64 / 3.0).sqrt() / 4.0 * 100.0;
        assert!((m.coefficient_of_variation(len) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_clear() {
        let (mut m, _, _) = feed::<4>(&[1, 2, 3]);
        m.clear();

        assert_eq!(m.sum(), 0.0);
        assert_eq!(m.sum_of_squares(), 0.0);
        assert!(!m.is_stale());
    }
}
