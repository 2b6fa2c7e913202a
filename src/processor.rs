//! The signal processor: window, moments, filters and rate in one owner
//!
//! # Thread Safety
//!
//! `SignalProcessor` is `Send` but **not `Sync`**: `min()`, `max()` and
//! `range()` refresh a lazily rescanned cache through `&self`. There is no
//! internal locking. When samples arrive from an interrupt handler and
//! statistics are read from the main loop, wrap `add*`/`reset*` calls and
//! reads in a critical section of your own.

use crate::config::SignalConfig;
use crate::filters::{Ema, LowPass};
use crate::math;
use crate::rate::RateTracker;
use crate::statistics::WindowMoments;
use crate::traits::{Sample, Smoother};
use crate::window::RingBuffer;

/// Default outlier cutoff, in standard deviations
pub const DEFAULT_SIGMA_THRESHOLD: f64 = 3.0;

/// Streaming statistics and filtering over the last `N` samples
///
/// Every sample updates, in order: the ring buffer (evicting the oldest
/// sample once full), the windowed moments, the EMA and low-pass filters,
/// and, for timestamped samples that pass the period gate, the derivative
/// and integral. All of it runs in O(1); only the first extrema query after
/// evicting the current min or max costs an O(N) rescan.
///
/// `N` must be in `2..=65535`; anything else fails to compile.
///
/// # Example
///
/// ```
/// use flowsignal::SignalProcessor;
///
/// let mut signal = SignalProcessor::<i16, 5>::new();
/// for v in [1, 2, 3, 4, 5] {
///     signal.add(v);
/// }
/// assert_eq!(signal.mean(), 3.0);
/// assert_eq!(signal.range(), 4.0);
///
/// // Evicts 1
/// signal.add(6);
/// assert_eq!(signal.mean(), 4.0);
/// assert_eq!(signal.min(), 2);
/// ```
///
/// # Timestamped samples
///
/// ```
/// use flowsignal::{SignalConfig, SignalProcessor};
///
/// let config = SignalConfig::default().with_min_derivative_period_ms(5);
/// let mut speed = SignalProcessor::<f32, 16>::with_config(config);
///
/// speed.add_at(0.0, 100);
/// speed.add_at(1.0, 200);
/// speed.add_at(2.0, 300);
///
/// assert!((speed.derivative() - 10.0).abs() < 1e-9);
/// assert!((speed.integral() - 0.2).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct SignalProcessor<T: Sample, const N: usize> {
    window: RingBuffer<T, N>,
    moments: WindowMoments<T>,
    ema: Ema,
    lowpass: LowPass,
    rate: RateTracker,
    /// Feed the EMA output, not the raw sample, to the rate tracker
    use_filtered_for_derivative: bool,
}

impl<T: Sample, const N: usize> Default for SignalProcessor<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample, const N: usize> SignalProcessor<T, N> {
    /// Create an empty processor with default coefficients
    pub fn new() -> Self {
        Self::with_config(SignalConfig::default())
    }

    /// Create an empty processor; coefficients are clamped into `[0, 1]`
    pub fn with_config(config: SignalConfig) -> Self {
        let mut processor = Self {
            window: RingBuffer::new(),
            moments: WindowMoments::new(),
            ema: Ema::default(),
            lowpass: LowPass::default(),
            rate: RateTracker::new(),
            use_filtered_for_derivative: false,
        };
        processor.apply_config(config);
        processor
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Replace all coefficients without touching sample state
    pub fn apply_config(&mut self, config: SignalConfig) {
        self.set_ema_alpha(config.ema_alpha);
        self.set_derivative_alpha(config.derivative_alpha);
        self.set_lowpass_alpha(config.lowpass_alpha);
        self.set_min_derivative_period_ms(config.min_derivative_period_ms);
        self.set_use_filtered_for_derivative(config.use_filtered_for_derivative);
    }

    /// Current configuration
    pub fn config(&self) -> SignalConfig {
        SignalConfig {
            ema_alpha: self.ema.alpha(),
            derivative_alpha: self.rate.alpha(),
            lowpass_alpha: self.lowpass.alpha(),
            min_derivative_period_ms: self.rate.min_period_ms(),
            use_filtered_for_derivative: self.use_filtered_for_derivative,
        }
    }

    /// Set the EMA coefficient; larger reacts faster
    ///
    /// Clamped into `[0, 1]`; NaN is ignored.
    pub fn set_ema_alpha(&mut self, alpha: f64) {
        let applied = self.ema.set_alpha(alpha);
        if applied != alpha {
            debug_event!(requested = alpha, applied, "ema alpha clamped");
        }
    }

    /// Set the derivative smoothing coefficient
    ///
    /// Clamped into `[0, 1]`; NaN is ignored.
    pub fn set_derivative_alpha(&mut self, alpha: f64) {
        let applied = self.rate.set_alpha(alpha);
        if applied != alpha {
            debug_event!(requested = alpha, applied, "derivative alpha clamped");
        }
    }

    /// Set the low-pass coefficient; smaller smooths harder
    ///
    /// Clamped into `[0, 1]`; NaN is ignored.
    pub fn set_lowpass_alpha(&mut self, alpha: f64) {
        let applied = self.lowpass.set_alpha(alpha);
        if applied != alpha {
            debug_event!(requested = alpha, applied, "lowpass alpha clamped");
        }
    }

    /// Skip rate updates closer together than `period_ms`; 0 disables the gate
    pub fn set_min_derivative_period_ms(&mut self, period_ms: u32) {
        self.rate.set_min_period_ms(period_ms);
    }

    /// Choose the EMA output (`true`) or the raw sample (`false`) as the
    /// derivative and integral input
    pub fn set_use_filtered_for_derivative(&mut self, enabled: bool) {
        self.use_filtered_for_derivative = enabled;
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Add a sample without a timestamp
    ///
    /// The rate tracker is not touched. Non-finite samples are ignored.
    #[inline]
    pub fn add(&mut self, value: T) {
        self.add_at(value, 0);
    }

    /// Add a sample taken at `time_ms` (millisecond tick)
    ///
    /// A zero timestamp means "untimed". The derivative and integral update
    /// only when more than the configured minimum period has elapsed since
    /// their last update; the window and filters always update. NaN and
    /// infinite samples are ignored, since either would leave the running
    /// sums undefined even after its eviction.
    pub fn add_at(&mut self, value: T, time_ms: u32) {
        if !value.is_finite() {
            return;
        }

        let evicted = self.window.push(value);
        self.moments.record(value, evicted, self.window.len());

        let x = value.to_f64();
        let smoothed = self.ema.apply(x);
        self.lowpass.apply(x);

        let rate_input = if self.use_filtered_for_derivative {
            smoothed
        } else {
            x
        };
        self.rate.update(rate_input, time_ms);
    }

    // ------------------------------------------------------------------
    // Resets
    // ------------------------------------------------------------------

    /// Discard all samples and derived state; configuration is kept
    pub fn reset(&mut self) {
        debug_event!(capacity = N, len = self.window.len(), "signal processor reset");
        self.window.clear();
        self.moments.clear();
        self.ema.reset();
        self.lowpass.reset();
        self.rate.reset();
    }

    /// Zero the integral only
    ///
    /// Statistics, filters and the derivative history are untouched.
    pub fn reset_integral(&mut self) {
        debug_event!(integral = self.rate.integral(), "integral reset");
        self.rate.reset_integral();
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Number of resident samples (0..=N)
    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Sum of resident samples
    #[inline]
    pub fn sum(&self) -> f64 {
        self.moments.sum()
    }

    /// Mean of resident samples, 0 when empty
    #[inline]
    pub fn mean(&self) -> f64 {
        self.moments.mean(self.window.len())
    }

    /// Sample variance, 0 with fewer than two samples, never negative
    #[inline]
    pub fn variance(&self) -> f64 {
        self.moments.variance(self.window.len())
    }

    /// Sample standard deviation
    #[inline]
    pub fn stddev(&self) -> f64 {
        self.moments.stddev(self.window.len())
    }

    /// `stddev / mean * 100`, 0 when the mean is 0
    #[inline]
    pub fn coefficient_of_variation(&self) -> f64 {
        self.moments.coefficient_of_variation(self.window.len())
    }

    /// Smallest resident sample, `T::default()` when empty
    pub fn min(&self) -> T {
        self.moments.min(self.window.as_slice())
    }

    /// Largest resident sample, `T::default()` when empty
    pub fn max(&self) -> T {
        self.moments.max(self.window.as_slice())
    }

    /// `max - min` in `f64`
    pub fn range(&self) -> f64 {
        self.moments.range(self.window.as_slice())
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Exponential moving average, 0 before the first sample
    #[inline]
    pub fn ema(&self) -> f64 {
        self.ema.value()
    }

    /// Simple moving average over the window (same as [`mean`](Self::mean))
    #[inline]
    pub fn sma(&self) -> f64 {
        self.mean()
    }

    /// Low-pass output, 0 before the first sample
    #[inline]
    pub fn lowpass(&self) -> f64 {
        self.lowpass.value()
    }

    // ------------------------------------------------------------------
    // Rate
    // ------------------------------------------------------------------

    /// Raw derivative, units per second
    #[inline]
    pub fn derivative(&self) -> f64 {
        self.rate.derivative()
    }

    /// Smoothed derivative, units per second
    #[inline]
    pub fn derivative_filtered(&self) -> f64 {
        self.rate.derivative_filtered()
    }

    /// Trapezoidal integral, units times seconds
    #[inline]
    pub fn integral(&self) -> f64 {
        self.rate.integral()
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// Whether `value` lies more than 3 standard deviations from the mean
    pub fn is_outlier(&self, value: T) -> bool {
        self.is_outlier_with(value, DEFAULT_SIGMA_THRESHOLD)
    }

    /// Whether `value` lies more than `sigma` standard deviations from the
    /// mean
    ///
    /// Always `false` with fewer than two samples or a zero standard
    /// deviation.
    pub fn is_outlier_with(&self, value: T, sigma: f64) -> bool {
        let len = self.window.len();
        if len < 2 {
            return false;
        }

        let stddev = self.moments.stddev(len);
        if stddev == 0.0 {
            return false;
        }

        math::abs(value.to_f64() - self.moments.mean(len)) > sigma * stddev
    }

    /// Whether the window is at least half full and its standard deviation
    /// is below `max_stddev`
    pub fn is_stable(&self, max_stddev: f64) -> bool {
        self.window.len() >= N / 2 && self.stddev() < max_stddev
    }

    /// Whether the window holds `N` samples
    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.is_full()
    }

    /// Whether the window holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    // ------------------------------------------------------------------
    // Raw access
    // ------------------------------------------------------------------

    /// Resident samples in raw ring order
    ///
    /// **Not chronological** once the window has wrapped: the newest sample
    /// sits just before the next write position, not at the end.
    #[inline]
    pub fn raw_buffer(&self) -> &[T] {
        self.window.as_slice()
    }

    /// Fixed window capacity `N`
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Value fed to the rate tracker at its last update, 0 before any
    ///
    /// This is the EMA output when the filtered derivative input is enabled.
    #[inline]
    pub fn last_value(&self) -> f64 {
        self.rate.last_value()
    }

    /// Timestamp of the last rate update, 0 before any
    #[inline]
    pub fn last_time_ms(&self) -> u32 {
        self.rate.last_time_ms()
    }

    /// Capture every derived output at once
    pub fn snapshot(&self) -> SignalSnapshot {
        let window = self.window.as_slice();
        SignalSnapshot {
            len: self.window.len(),
            mean: self.mean(),
            variance: self.variance(),
            stddev: self.stddev(),
            coefficient_of_variation: self.coefficient_of_variation(),
            min: self.moments.min(window).to_f64(),
            max: self.moments.max(window).to_f64(),
            range: self.moments.range(window),
            ema: self.ema(),
            lowpass: self.lowpass(),
            derivative: self.derivative(),
            derivative_filtered: self.derivative_filtered(),
            integral: self.integral(),
            last_time_ms: self.last_time_ms(),
        }
    }
}

impl<T: Sample, const N: usize> core::ops::AddAssign<T> for SignalProcessor<T, N> {
    /// Same as [`SignalProcessor::add`]
    fn add_assign(&mut self, value: T) {
        self.add(value);
    }
}

impl<T: Sample, const N: usize> Extend<T> for SignalProcessor<T, N> {
    /// Add untimed samples in order
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Point-in-time copy of every output of a [`SignalProcessor`]
///
/// Extrema are widened to `f64` so snapshots of different sample types share
/// one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSnapshot {
    pub len: usize,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub ema: f64,
    pub lowpass: f64,
    pub derivative: f64,
    pub derivative_filtered: f64,
    pub integral: f64,
    pub last_time_ms: u32,
}
