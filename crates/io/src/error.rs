//! Error types for gradecast-io.

use std::path::PathBuf;

use gradecast_forecast::ForecastError;

/// Error type for all fallible operations in the gradecast-io crate.
///
/// Covers file access, CSV decoding, record validation, and the per-group
/// assembly problems that prevent a history matrix from being built.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the CSV reader.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Returned when one or more record validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a wide export lacks a required header cell.
    #[error("missing column: {column:?}")]
    MissingColumn {
        /// Header text that was expected.
        column: String,
    },

    /// Returned when a month cell cannot be parsed.
    #[error("invalid month: {value:?}")]
    InvalidMonth {
        /// The cell content.
        value: String,
    },

    /// Returned when a quality group has no entry in the heat plan.
    #[error("no heat plan for quality group '{group}'")]
    MissingPlan {
        /// Name of the quality group.
        group: String,
    },

    /// Returned when a quality group has fewer months than the window needs.
    #[error("quality group '{group}' has {available} month(s) of history, need {required}")]
    InsufficientHistory {
        /// Name of the quality group.
        group: String,
        /// Number of distinct months available.
        available: usize,
        /// Number of months the forecast window requires.
        required: usize,
    },

    /// Returned when the assembled history is rejected by the forecaster.
    #[error("invalid history: {0}")]
    Forecast(#[from] ForecastError),
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_csv() {
        let err = IoError::Csv {
            reason: "unequal lengths".to_string(),
        };
        assert_eq!(err.to_string(), "csv error: unequal lengths");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "negative production on line 3; empty quality group on line 5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): negative production on line 3; empty quality group on line 5"
        );
    }

    #[test]
    fn display_invalid_month() {
        let err = IoError::InvalidMonth {
            value: "2024-13".to_string(),
        };
        assert_eq!(err.to_string(), "invalid month: \"2024-13\"");
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            column: "Quality:".to_string(),
        };
        assert_eq!(err.to_string(), "missing column: \"Quality:\"");
    }

    #[test]
    fn display_missing_plan() {
        let err = IoError::MissingPlan {
            group: "SBQ".to_string(),
        };
        assert_eq!(err.to_string(), "no heat plan for quality group 'SBQ'");
    }

    #[test]
    fn display_insufficient_history() {
        let err = IoError::InsufficientHistory {
            group: "CHQ".to_string(),
            available: 2,
            required: 3,
        };
        assert_eq!(
            err.to_string(),
            "quality group 'CHQ' has 2 month(s) of history, need 3"
        );
    }

    #[test]
    fn from_forecast_error() {
        let err: IoError = ForecastError::InvalidTotal { total: -1.0 }.into();
        assert!(matches!(err, IoError::Forecast(_)));
        assert!(err.to_string().starts_with("invalid history: invalid total"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
