//! Core traits for the signal engine
//!
//! [`Sample`] abstracts over the scalar types a sensor or ADC can produce,
//! and [`Smoother`] is the common face of the first-order filters in
//! [`filters`](crate::filters).

use core::fmt::Debug;

/// A scalar sample that can be stored in the window and widened to `f64`
///
/// All accumulators work in `f64` regardless of the sample type, so the
/// conversion must not lose more precision than `f64` itself does.
pub trait Sample: Copy + PartialOrd + Default + Debug {
    /// Widen the sample to `f64`
    fn to_f64(self) -> f64;

    /// Whether the sample is NaN
    ///
    /// Integer samples are never NaN.
    #[inline]
    fn is_nan(self) -> bool {
        false
    }

    /// Whether the sample is neither NaN nor infinite
    ///
    /// Integer samples are always finite.
    #[inline]
    fn is_finite(self) -> bool {
        true
    }
}

macro_rules! impl_sample_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// A recursive smoothing filter with seed-on-first-input semantics
pub trait Smoother {
    /// Feed one input and return the new output
    fn apply(&mut self, input: f64) -> f64;

    /// Current output, or 0 before the first input
    fn value(&self) -> f64;

    /// Whether the filter has seen at least one input
    fn is_seeded(&self) -> bool;

    /// Forget all history; the next input seeds the filter again
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening() {
        assert_eq!(200u8.to_f64(), 200.0);
        assert_eq!((-32768i16).to_f64(), -32768.0);
        assert_eq!(1.5f32.to_f64(), 1.5);
        assert_eq!(u32::MAX.to_f64(), 4294967295.0);
    }

    #[test]
    fn test_nan_detection() {
        assert!(Sample::is_nan(f32::NAN));
        assert!(Sample::is_nan(f64::NAN));
        assert!(!Sample::is_nan(1.0f64));
        assert!(!Sample::is_nan(0i32));
    }

    #[test]
    fn test_finite_detection() {
        assert!(!Sample::is_finite(f32::INFINITY));
        assert!(!Sample::is_finite(f64::NEG_INFINITY));
        assert!(!Sample::is_finite(f64::NAN));
        assert!(Sample::is_finite(-3.5f32));
        assert!(Sample::is_finite(i64::MIN));
    }
}
