//! Processor configuration
//!
//! [`SignalConfig`] gathers the tunable coefficients. Builder methods clamp
//! on the way in, matching the processor's setters; [`SignalConfig::validate`]
//! is the strict check for settings that arrive from outside (for example a
//! deserialized configuration block).

use crate::filters::{Ema, LowPass};
use crate::math;
use crate::rate::DEFAULT_DERIVATIVE_ALPHA;

/// Which coefficient a [`ConfigError`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    EmaAlpha,
    DerivativeAlpha,
    LowpassAlpha,
}

impl core::fmt::Display for Coefficient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Coefficient::EmaAlpha => "ema_alpha",
            Coefficient::DerivativeAlpha => "derivative_alpha",
            Coefficient::LowpassAlpha => "lowpass_alpha",
        };
        f.write_str(name)
    }
}

/// Error from strict configuration validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Coefficient lies outside `[0, 1]`
    OutOfRange { coefficient: Coefficient, value: f64 },
    /// Coefficient is NaN
    NotANumber { coefficient: Coefficient },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::OutOfRange { coefficient, value } => {
                write!(f, "{} out of range: expected 0..=1, found {}", coefficient, value)
            }
            ConfigError::NotANumber { coefficient } => {
                write!(f, "{} is NaN", coefficient)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Tunable parameters of a [`SignalProcessor`](crate::SignalProcessor)
///
/// # Example
///
/// ```
/// use flowsignal::SignalConfig;
///
/// let config = SignalConfig::default()
///     .with_ema_alpha(0.25)
///     .with_min_derivative_period_ms(20)
///     .with_filtered_derivative(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(SignalConfig::default().with_lowpass_alpha(3.0).lowpass_alpha, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalConfig {
    /// EMA weight of the newest sample
    pub ema_alpha: f64,
    /// Weight of the newest raw derivative in the smoothed derivative
    pub derivative_alpha: f64,
    /// Low-pass weight of the newest sample
    pub lowpass_alpha: f64,
    /// Rate updates closer together than this are skipped; 0 disables the gate
    pub min_derivative_period_ms: u32,
    /// Differentiate and integrate the EMA output instead of the raw sample
    pub use_filtered_for_derivative: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ema_alpha: Ema::DEFAULT_ALPHA,
            derivative_alpha: DEFAULT_DERIVATIVE_ALPHA,
            lowpass_alpha: LowPass::DEFAULT_ALPHA,
            min_derivative_period_ms: 0,
            use_filtered_for_derivative: false,
        }
    }
}

impl SignalConfig {
    /// Set the EMA coefficient (clamped, NaN ignored)
    pub fn with_ema_alpha(mut self, alpha: f64) -> Self {
        if let Some(alpha) = math::clamp_unit(alpha) {
            self.ema_alpha = alpha;
        }
        self
    }

    /// Set the derivative smoothing coefficient (clamped, NaN ignored)
    pub fn with_derivative_alpha(mut self, alpha: f64) -> Self {
        if let Some(alpha) = math::clamp_unit(alpha) {
            self.derivative_alpha = alpha;
        }
        self
    }

    /// Set the low-pass coefficient (clamped, NaN ignored)
    pub fn with_lowpass_alpha(mut self, alpha: f64) -> Self {
        if let Some(alpha) = math::clamp_unit(alpha) {
            self.lowpass_alpha = alpha;
        }
        self
    }

    pub fn with_min_derivative_period_ms(mut self, period_ms: u32) -> Self {
        self.min_derivative_period_ms = period_ms;
        self
    }

    pub fn with_filtered_derivative(mut self, enabled: bool) -> Self {
        self.use_filtered_for_derivative = enabled;
        self
    }

    /// Check every coefficient without clamping
    ///
    /// Reports the first offending coefficient in declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coefficients = [
            (Coefficient::EmaAlpha, self.ema_alpha),
            (Coefficient::DerivativeAlpha, self.derivative_alpha),
            (Coefficient::LowpassAlpha, self.lowpass_alpha),
        ];

        for (coefficient, value) in coefficients {
            if value.is_nan() {
                return Err(ConfigError::NotANumber { coefficient });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { coefficient, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignalConfig::default();

        assert_eq!(config.ema_alpha, 0.1);
        assert_eq!(config.derivative_alpha, 0.2);
        assert_eq!(config.lowpass_alpha, 0.1);
        assert_eq!(config.min_derivative_period_ms, 0);
        assert!(!config.use_filtered_for_derivative);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_clamps() {
        let config = SignalConfig::default()
            .with_ema_alpha(-0.5)
            .with_derivative_alpha(1.5)
            .with_lowpass_alpha(f64::NAN);

        assert_eq!(config.ema_alpha, 0.0);
        assert_eq!(config.derivative_alpha, 1.0);
        assert_eq!(config.lowpass_alpha, 0.1);
    }

    #[test]
    fn test_validate_reports_first_error() {
        let config = SignalConfig {
            derivative_alpha: 1.2,
            lowpass_alpha: f64::NAN,
            ..SignalConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                coefficient: Coefficient::DerivativeAlpha,
                value: 1.2
            })
        );
    }

    #[test]
    fn test_validate_nan() {
        let config = SignalConfig {
            ema_alpha: f64::NAN,
            ..SignalConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::NotANumber {
                coefficient: Coefficient::EmaAlpha
            })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_error_display() {
        let err = ConfigError::OutOfRange {
            coefficient: Coefficient::LowpassAlpha,
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "lowpass_alpha out of range: expected 0..=1, found -1"
        );
    }
}
