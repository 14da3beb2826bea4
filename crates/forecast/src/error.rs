//! Error types for the gradecast-forecast crate.

/// Error type for all fallible operations in the gradecast-forecast crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// Returned when the history has no categories or the wrong number of
    /// periods for the configured window.
    #[error(
        "invalid history shape: {n_categories} categories x {n_periods} periods (expected >= 1 x {expected_periods})"
    )]
    InvalidShape {
        /// Number of categories (rows) supplied.
        n_categories: usize,
        /// Number of periods (columns) supplied.
        n_periods: usize,
        /// Number of periods the forecast window requires.
        expected_periods: usize,
    },

    /// Returned when history rows differ in length.
    #[error("ragged history: category {category} has {len} periods, expected {expected}")]
    RaggedHistory {
        /// Row index of the offending category.
        category: usize,
        /// Length of that row.
        len: usize,
        /// Length of the first row.
        expected: usize,
    },

    /// Returned when a history entry is negative or not finite.
    #[error("invalid history value at category {category}, period {period}: {value}")]
    InvalidValue {
        /// Row index of the offending entry.
        category: usize,
        /// Column index of the offending entry.
        period: usize,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the known total is negative or not finite.
    #[error("invalid total: {total} (must be finite and >= 0)")]
    InvalidTotal {
        /// The rejected total.
        total: f64,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the recency-weighted group total is zero, so the
    /// forecasts cannot be rescaled to the known total.
    #[error("degenerate history: recency-weighted group total is {weighted_total}")]
    DegenerateHistory {
        /// The recency-weighted average of the group total row.
        weighted_total: f64,
    },

    /// Returned when an intermediate quantity overflows to infinity or NaN
    /// even though every input was finite.
    #[error("numeric overflow: {quantity} is {value}")]
    Overflow {
        /// The quantity that stopped being finite.
        quantity: String,
        /// Its value.
        value: f64,
    },

    /// Returned when no category has a strictly positive weighted variance,
    /// so there is no floor for the zero-variance categories.
    #[error("degenerate variance: none of the {n_categories} categories has positive variance")]
    DegenerateVariance {
        /// Number of categories in the group.
        n_categories: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_shape() {
        let e = ForecastError::InvalidShape {
            n_categories: 2,
            n_periods: 4,
            expected_periods: 3,
        };
        assert_eq!(
            e.to_string(),
            "invalid history shape: 2 categories x 4 periods (expected >= 1 x 3)"
        );
    }

    #[test]
    fn error_ragged_history() {
        let e = ForecastError::RaggedHistory {
            category: 1,
            len: 2,
            expected: 3,
        };
        assert_eq!(
            e.to_string(),
            "ragged history: category 1 has 2 periods, expected 3"
        );
    }

    #[test]
    fn error_invalid_value() {
        let e = ForecastError::InvalidValue {
            category: 0,
            period: 2,
            value: -1.5,
        };
        assert_eq!(
            e.to_string(),
            "invalid history value at category 0, period 2: -1.5"
        );
    }

    #[test]
    fn error_invalid_total() {
        let e = ForecastError::InvalidTotal { total: f64::NAN };
        assert_eq!(e.to_string(), "invalid total: NaN (must be finite and >= 0)");
    }

    #[test]
    fn error_invalid_config() {
        let e = ForecastError::InvalidConfig {
            reason: "n_periods must be >= 1".to_string(),
        };
        assert_eq!(e.to_string(), "invalid configuration: n_periods must be >= 1");
    }

    #[test]
    fn error_degenerate_history() {
        let e = ForecastError::DegenerateHistory {
            weighted_total: 0.0,
        };
        assert_eq!(
            e.to_string(),
            "degenerate history: recency-weighted group total is 0"
        );
    }

    #[test]
    fn error_overflow() {
        let e = ForecastError::Overflow {
            quantity: "forecast of category 0".to_string(),
            value: f64::INFINITY,
        };
        assert_eq!(e.to_string(), "numeric overflow: forecast of category 0 is inf");
    }

    #[test]
    fn error_degenerate_variance() {
        let e = ForecastError::DegenerateVariance { n_categories: 3 };
        assert_eq!(
            e.to_string(),
            "degenerate variance: none of the 3 categories has positive variance"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ForecastError>();
    }
}
