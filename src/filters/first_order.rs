//! First-order recursive filters
//!
//! Both the EMA and the low-pass filter run the same recurrence
//! `y = α·x + (1 − α)·y`, seeded by their first input. They are kept as
//! distinct types because they are tuned for different goals and carry
//! independent coefficients and state.

use crate::math;
use crate::traits::Smoother;

/// Seeded first-order IIR state
///
/// # Example
///
/// ```
/// use flowsignal::filters::FirstOrder;
/// use flowsignal::traits::Smoother;
///
/// let mut filter = FirstOrder::new(0.5);
/// assert_eq!(filter.apply(10.0), 10.0); // seeds
/// assert_eq!(filter.apply(20.0), 15.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstOrder {
    /// Weight of the newest input, in `[0, 1]`
    alpha: f64,
    /// Current output, meaningful only once seeded
    output: f64,
    seeded: bool,
}

impl FirstOrder {
    /// Create a filter; `alpha` is clamped into `[0, 1]` and NaN becomes 0
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: math::clamp_unit(alpha).unwrap_or(0.0),
            output: 0.0,
            seeded: false,
        }
    }

    /// Smoothing coefficient
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Change the coefficient without touching the filter state
    ///
    /// Values outside `[0, 1]` are clamped. NaN is ignored and the previous
    /// coefficient kept; returns the coefficient now in effect.
    pub fn set_alpha(&mut self, alpha: f64) -> f64 {
        if let Some(alpha) = math::clamp_unit(alpha) {
            self.alpha = alpha;
        }
        self.alpha
    }
}

impl Smoother for FirstOrder {
    #[inline]
    fn apply(&mut self, input: f64) -> f64 {
        if self.seeded {
            self.output = self.alpha * input + (1.0 - self.alpha) * self.output;
        } else {
            self.output = input;
            self.seeded = true;
        }
        self.output
    }

    #[inline]
    fn value(&self) -> f64 {
        self.output
    }

    #[inline]
    fn is_seeded(&self) -> bool {
        self.seeded
    }

    fn reset(&mut self) {
        self.output = 0.0;
        self.seeded = false;
    }
}

macro_rules! first_order_filter {
    ($(#[$meta:meta])* $name:ident, $default_alpha:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name(FirstOrder);

        impl $name {
            /// Coefficient used by [`Default`]
            pub const DEFAULT_ALPHA: f64 = $default_alpha;

            /// Create a filter; `alpha` is clamped into `[0, 1]`
            pub fn new(alpha: f64) -> Self {
                Self(FirstOrder::new(alpha))
            }

            /// Smoothing coefficient
            #[inline]
            pub fn alpha(&self) -> f64 {
                self.0.alpha()
            }

            /// Change the coefficient (clamped, NaN ignored) without
            /// touching the filter state
            pub fn set_alpha(&mut self, alpha: f64) -> f64 {
                self.0.set_alpha(alpha)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new(Self::DEFAULT_ALPHA)
            }
        }

        impl Smoother for $name {
            #[inline]
            fn apply(&mut self, input: f64) -> f64 {
                self.0.apply(input)
            }

            #[inline]
            fn value(&self) -> f64 {
                self.0.value()
            }

            #[inline]
            fn is_seeded(&self) -> bool {
                self.0.is_seeded()
            }

            fn reset(&mut self) {
                self.0.reset()
            }
        }
    };
}

first_order_filter!(
    /// Exponential moving average
    ///
    /// Larger `alpha` reacts faster; smaller `alpha` smooths harder.
    Ema,
    0.1
);

first_order_filter!(
    /// First-order low-pass filter
    ///
    /// Same recurrence as [`Ema`] with its own coefficient and seed state.
    LowPass,
    0.1
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_input_seeds() {
        let mut ema = Ema::default();
        assert!(!ema.is_seeded());
        assert_eq!(ema.apply(0.5), 0.5);
        assert!(ema.is_seeded());
    }

    #[test]
    fn test_smoothing_step() {
        let mut ema = Ema::new(0.3);
        ema.apply(0.0);

        // 0.3 * 1.0 + 0.7 * 0.0
        assert!((ema.apply(1.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_converges_to_constant() {
        let mut lp = LowPass::new(0.1);
        lp.apply(0.0);
        for _ in 0..500 {
            lp.apply(7.0);
        }
        assert!((lp.value() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Ema::new(-1.0).alpha(), 0.0);
        assert_eq!(Ema::new(2.0).alpha(), 1.0);

        let mut lp = LowPass::new(0.4);
        assert_eq!(lp.set_alpha(f64::NAN), 0.4);
        assert_eq!(lp.set_alpha(1.5), 1.0);
    }

    #[test]
    fn test_alpha_zero_holds_seed() {
        let mut ema = Ema::new(0.0);
        ema.apply(3.0);
        ema.apply(100.0);
        assert_eq!(ema.value(), 3.0);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut ema = Ema::default();
        ema.apply(10.0);
        ema.apply(20.0);

        ema.reset();
        assert_eq!(ema.value(), 0.0);
        assert_eq!(ema.apply(-4.0), -4.0);
    }
}
