//! Recency-weighted point forecast, rescaled to a known group total.

use gradecast_stats::{recency_weights, weighted_average};
use tracing::debug;

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::history::HistoryMatrix;

/// Point forecast for one group together with the history it came from.
///
/// Holds the category history, the synthetic group-total row (column sums of
/// the history) and the forecast column. The forecasts of the categories sum
/// to [`total`](Self::total) up to floating-point rounding, and the group-total
/// row's forecast is `total` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    history: HistoryMatrix,
    group_history: Vec<f64>,
    levels: Vec<f64>,
    group_level: f64,
    predicted: Vec<f64>,
    total: f64,
}

impl Forecast {
    /// Number of categories.
    pub fn n_categories(&self) -> usize {
        self.history.n_categories()
    }

    /// Forecast per category for the next period.
    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }

    /// The known total for the forecast period.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// The category history the forecast was computed from.
    pub fn history(&self) -> &HistoryMatrix {
        &self.history
    }

    /// Group total per historical period.
    pub fn group_history(&self) -> &[f64] {
        &self.group_history
    }

    /// Recency-weighted average level per category.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Recency-weighted average level of the group total row.
    pub fn group_level(&self) -> f64 {
        self.group_level
    }

    /// History of one category followed by its forecast.
    ///
    /// # Panics
    ///
    /// Panics if `category >= n_categories()`.
    pub fn category_series(&self, category: usize) -> Vec<f64> {
        let mut series = self.history.row(category).to_vec();
        series.push(self.predicted[category]);
        series
    }

    /// Group total history followed by the known total.
    pub fn group_series(&self) -> Vec<f64> {
        let mut series = self.group_history.clone();
        series.push(self.total);
        series
    }

    /// `(categories + 1) x (periods + 1)` history-plus-forecast rows, with
    /// the group total as the last row.
    pub fn augmented(&self) -> Vec<Vec<f64>> {
        (0..self.n_categories())
            .map(|c| self.category_series(c))
            .chain(std::iter::once(self.group_series()))
            .collect()
    }
}

/// Computes the forecast once inputs have been validated.
pub(crate) fn compute_forecast(
    history: &HistoryMatrix,
    total: f64,
    config: &ForecastConfig,
) -> Result<Forecast, ForecastError> {
    let weights = recency_weights(config.n_periods());

    let group_history = history.column_sums();
    let group_level = weighted_average(&group_history, &weights);
    if !group_level.is_finite() {
        return Err(ForecastError::Overflow {
            quantity: "recency-weighted group total".to_string(),
            value: group_level,
        });
    }
    if group_level <= 0.0 {
        return Err(ForecastError::DegenerateHistory {
            weighted_total: group_level,
        });
    }

    let levels: Vec<f64> = history
        .rows()
        .map(|row| weighted_average(row, &weights))
        .collect();

    let predicted: Vec<f64> = levels.iter().map(|&r| r * total / group_level).collect();
    if let Some((c, &p)) = predicted.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(ForecastError::Overflow {
            quantity: format!("forecast of category {c}"),
            value: p,
        });
    }

    debug!(
        n_categories = history.n_categories(),
        group_level, total, "rescaled recency-weighted levels to total"
    );

    Ok(Forecast {
        history: history.clone(),
        group_history,
        levels,
        group_level,
        predicted,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(rows: &[[f64; 3]], total: f64) -> Result<Forecast, ForecastError> {
        let history = HistoryMatrix::from_rows(rows).unwrap();
        compute_forecast(&history, total, &ForecastConfig::new())
    }

    #[test]
    fn flat_series_keep_proportions() {
        let fc = run(&[[100.0; 3], [50.0; 3], [0.0; 3]], 150.0).unwrap();
        assert_relative_eq!(fc.predicted()[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(fc.predicted()[1], 50.0, epsilon = 1e-9);
        assert_eq!(fc.predicted()[2], 0.0);
    }

    #[test]
    fn levels_are_recency_weighted() {
        let fc = run(&[[0.0, 0.0, 10.0], [10.0, 0.0, 0.0]], 1.0).unwrap();
        assert!(fc.levels()[0] > fc.levels()[1]);
        assert_relative_eq!(
            fc.levels()[0] + fc.levels()[1],
            fc.group_level(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn group_series_ends_with_total() {
        let fc = run(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], 42.0).unwrap();
        assert_eq!(fc.group_history(), &[5.0, 7.0, 9.0]);
        assert_eq!(fc.group_series(), vec![5.0, 7.0, 9.0, 42.0]);
    }

    #[test]
    fn augmented_shape() {
        let fc = run(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], 42.0).unwrap();
        let aug = fc.augmented();
        assert_eq!(aug.len(), 3);
        assert!(aug.iter().all(|r| r.len() == 4));
        assert_eq!(aug[0][..3], [1.0, 2.0, 3.0]);
        assert_eq!(aug[2][3], 42.0);
    }

    #[test]
    fn zero_total_gives_zero_forecast() {
        let fc = run(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], 0.0).unwrap();
        assert!(fc.predicted().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn overflowing_forecast_is_an_error() {
        let result = run(&[[1e300; 3], [1.0, 2.0, 3.0]], 1e300);
        assert!(matches!(
            result,
            Err(ForecastError::Overflow { ref quantity, value })
                if quantity == "forecast of category 0" && value.is_infinite()
        ));
    }

    #[test]
    fn overflowing_group_total_is_not_degenerate() {
        let result = run(&[[f64::MAX; 3], [f64::MAX; 3]], 1.0);
        assert!(matches!(result, Err(ForecastError::Overflow { .. })));
    }

    #[test]
    fn all_zero_history_is_degenerate() {
        let result = run(&[[0.0; 3], [0.0; 3]], 10.0);
        assert!(matches!(
            result,
            Err(ForecastError::DegenerateHistory { .. })
        ));
    }
}
