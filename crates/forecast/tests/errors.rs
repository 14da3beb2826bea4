//! Integration tests for ForecastError variants.

use gradecast_forecast::{ForecastConfig, ForecastError, HistoryMatrix, forecast, interval};

#[test]
fn error_wrong_period_count() {
    let history = HistoryMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let result = interval(&history, 10.0, &ForecastConfig::new());
    assert!(matches!(
        result,
        Err(ForecastError::InvalidShape {
            n_categories: 2,
            n_periods: 2,
            expected_periods: 3
        })
    ));
}

#[test]
fn error_no_categories() {
    let rows: Vec<[f64; 3]> = Vec::new();
    assert!(matches!(
        HistoryMatrix::from_rows(&rows),
        Err(ForecastError::InvalidShape { n_categories: 0, .. })
    ));
}

#[test]
fn error_ragged_rows() {
    let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]];
    assert!(matches!(
        HistoryMatrix::from_rows(&rows),
        Err(ForecastError::RaggedHistory { category: 1, .. })
    ));
}

#[test]
fn error_negative_history() {
    let result = HistoryMatrix::from_rows(&[[1.0, -2.0, 3.0]]);
    assert!(matches!(
        result,
        Err(ForecastError::InvalidValue {
            category: 0,
            period: 1,
            ..
        })
    ));
}

#[test]
fn error_all_zero_history() {
    let history = HistoryMatrix::from_rows(&[[0.0; 3], [0.0; 3]]).unwrap();
    let result = forecast(&history, 100.0, &ForecastConfig::new());
    assert!(matches!(
        result,
        Err(ForecastError::DegenerateHistory { weighted_total }) if weighted_total == 0.0
    ));
}

#[test]
fn error_all_zero_history_through_interval() {
    let history = HistoryMatrix::from_rows(&[[0.0; 3]]).unwrap();
    let result = interval(&history, 100.0, &ForecastConfig::new());
    assert!(matches!(
        result,
        Err(ForecastError::DegenerateHistory { .. })
    ));
}

#[test]
fn error_no_positive_variance() {
    let history = HistoryMatrix::from_rows(&[[100.0; 3], [50.0; 3], [0.0; 3]]).unwrap();
    let result = interval(&history, 150.0, &ForecastConfig::new());
    assert!(matches!(
        result,
        Err(ForecastError::DegenerateVariance { n_categories: 3 })
    ));
}

#[test]
fn error_negative_total() {
    let history = HistoryMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
    let result = forecast(&history, -5.0, &ForecastConfig::new());
    assert!(matches!(result, Err(ForecastError::InvalidTotal { .. })));
}

#[test]
fn error_nan_total() {
    let history = HistoryMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
    let result = interval(&history, f64::NAN, &ForecastConfig::new());
    assert!(matches!(result, Err(ForecastError::InvalidTotal { .. })));
}

#[test]
fn error_invalid_config() {
    let history = HistoryMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
    let config = ForecastConfig::new().with_n_periods(0);
    let result = forecast(&history, 5.0, &config);
    assert!(matches!(result, Err(ForecastError::InvalidConfig { .. })));
}

#[test]
fn error_overflowing_forecast() {
    let history = HistoryMatrix::from_rows(&[[1e300; 3], [1.0, 2.0, 3.0]]).unwrap();
    let config = ForecastConfig::new();
    assert!(matches!(
        forecast(&history, 1e300, &config),
        Err(ForecastError::Overflow { .. })
    ));
    assert!(matches!(
        interval(&history, 1e300, &config),
        Err(ForecastError::Overflow { .. })
    ));
}

#[test]
fn error_overflowing_variance() {
    let history = HistoryMatrix::from_rows(&[[1e200, 0.0, 1e200], [0.0, 1e200, 0.0]]).unwrap();
    let config = ForecastConfig::new();
    let fc = forecast(&history, 1.0, &config).unwrap();
    assert!(fc.predicted().iter().all(|p| p.is_finite()));
    assert!(matches!(
        interval(&history, 1.0, &config),
        Err(ForecastError::Overflow { .. })
    ));
}
