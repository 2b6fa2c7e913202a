//! Math function wrappers for std/no_std compatibility
//!
//! Uses standard library math when available, falls back to libm for no_std.

#[cfg(feature = "std")]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(feature = "std")]
#[inline]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn abs(x: f64) -> f64 {
    libm::fabs(x)
}

/// Clamp a filter coefficient into `[0, 1]`
///
/// Returns `None` for NaN so callers can keep their previous coefficient.
#[inline]
pub fn clamp_unit(x: f64) -> Option<f64> {
    if x.is_nan() {
        None
    } else if x < 0.0 {
        Some(0.0)
    } else if x > 1.0 {
        Some(1.0)
    } else {
        Some(x)
    }
}
