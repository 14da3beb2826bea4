//! Total-reconciled short-horizon forecasts for production categories.
//!
//! Given a few trailing periods of production per category (steel grade)
//! within a group, and the known group total for the next period, this crate
//! produces:
//!
//! - a point forecast per category that sums to the known total
//!   ([`forecast`]), and
//! - a heuristic prediction interval per category whose bounds stay
//!   consistent with that total ([`interval`]).
//!
//! # Pipeline
//!
//! 1. **Level**: recency-weighted average per category and for the group
//!    total row, with weights `exp(j - (P - 1))`
//! 2. **Rescale**: `forecast_i = level_i * total / level_group`
//! 3. **Spread**: weighted variance of history plus forecast, zero variances
//!    floored at the smallest positive one, Student-t margin
//! 4. **Reconcile**: cap upper bounds at the remaining budget, raise the
//!    widest interval's lower bound to what the others cannot cover
//!
//! # Glossary
//!
//! - **Category**: a steel grade or similar classification within a group
//! - **Group total**: sum over all categories for one period
//! - **Reconciliation**: forcing per-category values to agree with a known
//!   aggregate
//!
//! # Quick Start
//!
//! ```
//! use gradecast_forecast::{ForecastConfig, HistoryMatrix, forecast, interval};
//!
//! let history = HistoryMatrix::from_rows(&[
//!     [8724.0, 9230.0, 8989.0],
//!     [10880.0, 11030.0, 10822.0],
//!     [4111.0, 1557.0, 4756.0],
//! ])
//! .unwrap();
//! let config = ForecastConfig::new();
//!
//! let fc = forecast(&history, 23200.0, &config).unwrap();
//! let sum: f64 = fc.predicted().iter().sum();
//! assert!((sum - 23200.0).abs() < 1e-6);
//!
//! let table = interval(&history, 23200.0, &config).unwrap();
//! assert!(table.rows().iter().all(|r| r.lower >= 0.0 && r.upper <= 23200.0));
//! ```

mod config;
mod error;
pub(crate) mod forecast;
mod history;
pub(crate) mod interval;

pub use config::ForecastConfig;
pub use error::ForecastError;
pub use forecast::Forecast;
pub use history::HistoryMatrix;
pub use interval::{IntervalRow, IntervalTable};

/// Validates the inputs shared by [`forecast`] and [`interval`].
fn validate_inputs(
    history: &HistoryMatrix,
    total: f64,
    config: &ForecastConfig,
) -> Result<(), ForecastError> {
    // 1. History must match the configured window.
    if history.n_periods() != config.n_periods() {
        return Err(ForecastError::InvalidShape {
            n_categories: history.n_categories(),
            n_periods: history.n_periods(),
            expected_periods: config.n_periods(),
        });
    }

    // 2. Total must be a usable amount.
    if !total.is_finite() || total < 0.0 {
        return Err(ForecastError::InvalidTotal { total });
    }

    Ok(())
}

/// Forecasts each category for the next period, rescaled to `total`.
///
/// # Errors
///
/// - [`ForecastError::InvalidConfig`] if `config` is invalid.
/// - [`ForecastError::InvalidShape`] if the history does not have
///   `config.n_periods()` periods.
/// - [`ForecastError::InvalidTotal`] if `total` is negative or not finite.
/// - [`ForecastError::DegenerateHistory`] if the recency-weighted group total
///   is zero.
/// - [`ForecastError::Overflow`] if the group total or a forecast is not
///   finite despite finite inputs.
pub fn forecast(
    history: &HistoryMatrix,
    total: f64,
    config: &ForecastConfig,
) -> Result<Forecast, ForecastError> {
    config.validate()?;
    validate_inputs(history, total, config)?;
    forecast::compute_forecast(history, total, config)
}

/// Computes a prediction interval per category, consistent with `total`.
///
/// Runs [`forecast`] internally and uses its output as an extra observation.
///
/// # Errors
///
/// Everything [`forecast`] returns, plus
/// [`ForecastError::DegenerateVariance`] if no category has positive variance
/// and [`ForecastError::Overflow`] if a variance is not finite.
pub fn interval(
    history: &HistoryMatrix,
    total: f64,
    config: &ForecastConfig,
) -> Result<IntervalTable, ForecastError> {
    let fc = forecast(history, total, config)?;
    interval::compute_interval(&fc, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> HistoryMatrix {
        HistoryMatrix::from_rows(&[[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]]).unwrap()
    }

    #[test]
    fn validate_period_mismatch() {
        let config = ForecastConfig::new().with_n_periods(4);
        let result = forecast(&history(), 10.0, &config);
        assert!(matches!(
            result,
            Err(ForecastError::InvalidShape {
                n_periods: 3,
                expected_periods: 4,
                ..
            })
        ));
    }

    #[test]
    fn validate_negative_total() {
        let result = forecast(&history(), -1.0, &ForecastConfig::new());
        assert!(matches!(result, Err(ForecastError::InvalidTotal { .. })));
    }

    #[test]
    fn validate_infinite_total() {
        let result = interval(&history(), f64::INFINITY, &ForecastConfig::new());
        assert!(matches!(result, Err(ForecastError::InvalidTotal { .. })));
    }

    #[test]
    fn validate_bad_config() {
        let config = ForecastConfig::new().with_confidence(1.5);
        let result = interval(&history(), 10.0, &config);
        assert!(matches!(result, Err(ForecastError::InvalidConfig { .. })));
    }
}
