//! Configuration for forecasting and interval estimation.

use crate::error::ForecastError;

/// Configuration for [`forecast`](crate::forecast) and
/// [`interval`](crate::interval).
///
/// The history window `n_periods` drives every derived size: the recency
/// weight vector has `n_periods` entries, the variance series has
/// `n_periods + 1` (history plus forecast), the standard error is inflated by
/// `1 + 1 / (n_periods + 1)` and the Student-t quantile uses `n_periods`
/// degrees of freedom.
///
/// # Example
///
/// ```
/// use gradecast_forecast::ForecastConfig;
///
/// let config = ForecastConfig::new().with_confidence(0.9);
/// assert_eq!(config.n_periods(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastConfig {
    n_periods: usize,
    confidence: f64,
}

impl ForecastConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `n_periods = 3`, `confidence = 0.95`.
    pub fn new() -> Self {
        Self {
            n_periods: 3,
            confidence: 0.95,
        }
    }

    /// Sets the number of trailing history periods.
    pub fn with_n_periods(mut self, n: usize) -> Self {
        self.n_periods = n;
        self
    }

    /// Sets the two-sided confidence level of the prediction interval.
    pub fn with_confidence(mut self, c: f64) -> Self {
        self.confidence = c;
        self
    }

    /// Returns the number of trailing history periods.
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// Returns the two-sided confidence level.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Length of the per-category series used for variance estimation.
    pub fn n_augmented(&self) -> usize {
        self.n_periods + 1
    }

    /// Degrees of freedom for the Student-t quantile.
    pub fn degrees_of_freedom(&self) -> f64 {
        (self.n_augmented() - 1) as f64
    }

    /// Multiplier applied to the variance before taking the square root.
    pub fn variance_inflation(&self) -> f64 {
        1.0 + 1.0 / self.n_augmented() as f64
    }

    /// Validates this configuration.
    ///
    /// Checks that `n_periods` is at least 1 and `confidence` is finite and
    /// in the open interval (0, 1).
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.n_periods < 1 {
            return Err(ForecastError::InvalidConfig {
                reason: format!("n_periods must be >= 1, got {}", self.n_periods),
            });
        }

        if !self.confidence.is_finite() || self.confidence <= 0.0 || self.confidence >= 1.0 {
            return Err(ForecastError::InvalidConfig {
                reason: format!(
                    "confidence must be in (0, 1) and finite, got {}",
                    self.confidence
                ),
            });
        }

        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ForecastConfig::new();
        assert_eq!(cfg.n_periods(), 3);
        assert!((cfg.confidence() - 0.95).abs() < f64::EPSILON);
        assert_eq!(cfg.n_augmented(), 4);
        assert!((cfg.degrees_of_freedom() - 3.0).abs() < f64::EPSILON);
        assert!((cfg.variance_inflation() - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn builder_chaining() {
        let cfg = ForecastConfig::new().with_n_periods(6).with_confidence(0.8);
        assert_eq!(cfg.n_periods(), 6);
        assert!((cfg.confidence() - 0.8).abs() < f64::EPSILON);
        assert!((cfg.degrees_of_freedom() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_ok() {
        assert!(ForecastConfig::new().validate().is_ok());
    }

    #[test]
    fn validate_zero_periods() {
        assert!(ForecastConfig::new().with_n_periods(0).validate().is_err());
    }

    #[test]
    fn validate_bad_confidence() {
        assert!(ForecastConfig::new().with_confidence(0.0).validate().is_err());
        assert!(ForecastConfig::new().with_confidence(1.0).validate().is_err());
        assert!(
            ForecastConfig::new()
                .with_confidence(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn default_trait() {
        assert_eq!(ForecastConfig::default(), ForecastConfig::new());
    }
}
