//! Derivative and trapezoidal integral under irregular sampling

use crate::math;

/// Default weight of the newest raw derivative in the smoothed derivative
pub const DEFAULT_DERIVATIVE_ALPHA: f64 = 0.2;

/// Where the tracker is in its two-state life
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RatePhase {
    /// No timestamped sample has passed the gate yet
    Idle,
    /// At least one sample passed the gate
    Tracking {
        /// Input value at the last accepted update
        last_value: f64,
        /// Timestamp of the last accepted update
        last_time_ms: u32,
    },
}

/// Rate-of-change and accumulation over timestamped samples
///
/// Timestamps are milliseconds from a free-running tick. An update is
/// accepted only when `time_ms` is non-zero and more than
/// `min_period_ms` has elapsed since the last accepted update (the
/// subtraction wraps, so tick rollover is handled). Rejected updates leave
/// every field untouched.
///
/// The tracker starts from a zero value at tick 0, so the first accepted
/// update differentiates against that origin and seeds the smoothed
/// derivative with the result. Integration starts with the second accepted
/// update.
///
/// # Example
///
/// ```
/// use flowsignal::rate::RateTracker;
///
/// let mut rate = RateTracker::new();
/// rate.update(0.0, 1000);
/// rate.update(5.0, 1500); // +5 over 0.5 s
///
/// assert_eq!(rate.derivative(), 10.0);
/// assert_eq!(rate.integral(), 1.25);
/// ```
#[derive(Clone, Debug)]
pub struct RateTracker {
    phase: RatePhase,
    /// Smoothing coefficient for the filtered derivative
    alpha: f64,
    /// Updates closer together than this are skipped
    min_period_ms: u32,
    /// Last raw derivative, units per second
    derivative: f64,
    /// Smoothed derivative
    derivative_filtered: f64,
    /// Accumulated trapezoidal integral, units times seconds
    integral: f64,
    /// Previous integrand for the trapezoid rule
    last_integrand: f64,
    /// Accepted updates, saturating
    accepted: u32,
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RateTracker {
    /// Create an idle tracker with the default smoothing and no period gate
    pub fn new() -> Self {
        Self::with_params(DEFAULT_DERIVATIVE_ALPHA, 0)
    }

    /// Create an idle tracker; `alpha` is clamped into `[0, 1]`
    pub fn with_params(alpha: f64, min_period_ms: u32) -> Self {
        Self {
            phase: RatePhase::Idle,
            alpha: math::clamp_unit(alpha).unwrap_or(DEFAULT_DERIVATIVE_ALPHA),
            min_period_ms,
            derivative: 0.0,
            derivative_filtered: 0.0,
            integral: 0.0,
            last_integrand: 0.0,
            accepted: 0,
        }
    }

    /// Feed one timestamped value
    ///
    /// Returns `true` if the update passed the gate and changed the state.
    pub fn update(&mut self, value: f64, time_ms: u32) -> bool {
        let last_time_ms = self.last_time_ms();
        if time_ms == 0 {
            return false;
        }
        let elapsed_ms = time_ms.wrapping_sub(last_time_ms);
        if elapsed_ms <= self.min_period_ms {
            return false;
        }

        self.accepted = self.accepted.saturating_add(1);

        let dt = elapsed_ms as f64 * 0.001;

        match self.phase {
            RatePhase::Idle => {
                let raw = value / dt;
                self.derivative = raw;
                self.derivative_filtered = raw;
            }
            RatePhase::Tracking { last_value, .. } => {
                let raw = (value - last_value) / dt;
                self.derivative = raw;
                self.derivative_filtered = if self.accepted <= 2 {
                    raw
                } else {
                    self.alpha * raw + (1.0 - self.alpha) * self.derivative_filtered
                };

                self.integral += 0.5 * (self.last_integrand + value) * dt;
            }
        }

        self.last_integrand = value;
        self.phase = RatePhase::Tracking {
            last_value: value,
            last_time_ms: time_ms,
        };
        true
    }

    /// Current phase
    #[inline]
    pub fn phase(&self) -> RatePhase {
        self.phase
    }

    /// Last raw derivative
    #[inline]
    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    /// Last smoothed derivative
    #[inline]
    pub fn derivative_filtered(&self) -> f64 {
        self.derivative_filtered
    }

    /// Accumulated integral
    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Input value at the last accepted update, 0 while idle
    #[inline]
    pub fn last_value(&self) -> f64 {
        match self.phase {
            RatePhase::Idle => 0.0,
            RatePhase::Tracking { last_value, .. } => last_value,
        }
    }

    /// Timestamp of the last accepted update, 0 while idle
    #[inline]
    pub fn last_time_ms(&self) -> u32 {
        match self.phase {
            RatePhase::Idle => 0,
            RatePhase::Tracking { last_time_ms, .. } => last_time_ms,
        }
    }

    /// Smoothing coefficient of the filtered derivative
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Change the smoothing coefficient (clamped, NaN ignored)
    pub fn set_alpha(&mut self, alpha: f64) -> f64 {
        if let Some(alpha) = math::clamp_unit(alpha) {
            self.alpha = alpha;
        }
        self.alpha
    }

    /// Minimum spacing between accepted updates
    pub fn min_period_ms(&self) -> u32 {
        self.min_period_ms
    }

    /// Change the minimum spacing; 0 disables the gate
    pub fn set_min_period_ms(&mut self, period_ms: u32) {
        self.min_period_ms = period_ms;
    }

    /// Zero the integral and its trapezoid history only
    ///
    /// Derivative state and the phase are kept, so velocity-style tracking
    /// continues while the accumulated position restarts from zero.
    pub fn reset_integral(&mut self) {
        self.integral = 0.0;
        self.last_integrand = 0.0;
    }

    /// Return to idle with all outputs zeroed; coefficients are kept
    pub fn reset(&mut self) {
        self.phase = RatePhase::Idle;
        self.derivative = 0.0;
        self.derivative_filtered = 0.0;
        self.integral = 0.0;
        self.last_integrand = 0.0;
        self.accepted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_differentiates_from_origin() {
        let mut rate = RateTracker::new();
        assert_eq!(rate.phase(), RatePhase::Idle);

        // 42 units over 0.5 s from the zero origin
        assert!(rate.update(42.0, 500));
        assert!((rate.derivative() - 84.0).abs() < 1e-9);
        assert_eq!(rate.derivative_filtered(), rate.derivative());
        assert_eq!(rate.integral(), 0.0);
        assert_eq!(
            rate.phase(),
            RatePhase::Tracking {
                last_value: 42.0,
                last_time_ms: 500
            }
        );
    }

    #[test]
    fn test_zero_timestamp_ignored() {
        let mut rate = RateTracker::new();
        assert!(!rate.update(1.0, 0));
        assert_eq!(rate.phase(), RatePhase::Idle);
    }

    #[test]
    fn test_ramp_derivative() {
        let mut rate = RateTracker::new();
        // value = 2 * seconds
        for step in 1..=10u32 {
            let t = step * 100;
            rate.update(2.0 * t as f64 / 1000.0, t);
        }

        assert!((rate.derivative() - 2.0).abs() < 1e-9);
        assert!((rate.derivative_filtered() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_filtered_seeded_then_smoothed() {
        let mut rate = RateTracker::with_params(0.5, 0);
        rate.update(0.0, 1000);
        rate.update(1.0, 2000); // raw 1, seeds
        assert_eq!(rate.derivative_filtered(), 1.0);

        rate.update(4.0, 3000); // raw 3
        assert_eq!(rate.derivative(), 3.0);
        assert_eq!(rate.derivative_filtered(), 2.0);
    }

    #[test]
    fn test_period_gate() {
        let mut rate = RateTracker::with_params(0.2, 50);
        rate.update(0.0, 1000);

        // 50 ms is not more than the 50 ms gate
        assert!(!rate.update(100.0, 1050));
        assert_eq!(rate.last_time_ms(), 1000);
        assert_eq!(rate.derivative(), 0.0);

        assert!(rate.update(1.0, 1100));
        assert!((rate.derivative() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_gate_while_idle() {
        let mut rate = RateTracker::with_params(0.2, 50);

        // Elapsed time is measured from tick 0 before the first update
        assert!(!rate.update(1.0, 30));
        assert!(!rate.update(1.0, 50));
        assert_eq!(rate.phase(), RatePhase::Idle);
        assert_eq!(rate.derivative(), 0.0);

        assert!(rate.update(1.0, 51));
        assert_eq!(rate.last_time_ms(), 51);
    }

    #[test]
    fn test_tick_rollover() {
        let mut rate = RateTracker::new();
        rate.update(0.0, u32::MAX - 99);
        // 200 ms later, after the tick wrapped
        assert!(rate.update(2.0, 100));
        assert!((rate.derivative() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_integral() {
        let mut rate = RateTracker::new();
        for step in 1..=11u32 {
            rate.update(5.0, step * 100);
        }
        // 10 intervals of 0.1 s at 5 units
        assert!((rate.integral() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_integral_is_narrow() {
        let mut rate = RateTracker::new();
        rate.update(0.0, 100);
        rate.update(1.0, 200);
        let derivative = rate.derivative();

        rate.reset_integral();

        assert_eq!(rate.integral(), 0.0);
        assert_eq!(rate.derivative(), derivative);
        assert_eq!(rate.last_time_ms(), 200);
    }

    #[test]
    fn test_reset() {
        let mut rate = RateTracker::with_params(0.7, 10);
        rate.update(1.0, 100);
        rate.update(3.0, 200);

        rate.reset();

        assert_eq!(rate.phase(), RatePhase::Idle);
        assert_eq!(rate.last_value(), 0.0);
        assert_eq!(rate.derivative_filtered(), 0.0);
        assert_eq!(rate.alpha(), 0.7);
        assert_eq!(rate.min_period_ms(), 10);
    }
}
