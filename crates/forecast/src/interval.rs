//! Prediction intervals that stay consistent with the known group total.
//!
//! The interval for each category is a heuristic: the point forecast is
//! appended to the history as an extra observation, a recency-weighted
//! variance is taken over that series, and a Student-t margin is placed
//! around the forecast. The raw bounds are then reconciled against the total:
//!
//! 1. Every upper bound above the total is replaced by
//!    `total - Σ lower` over the categories whose upper bound is below it.
//!    All capped categories receive the same value.
//! 2. The category with the widest margin (first on ties) has its lower bound
//!    raised to `total - Σ upper` over the categories with a strictly
//!    narrower margin.

use gradecast_stats::{
    argmax, floor_at, min_positive, normalize, recency_weights, student_t_quantile,
    two_sided_quantile, weighted_mean, weighted_variance,
};
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::forecast::Forecast;

/// One row of an [`IntervalTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRow {
    /// Point forecast.
    pub predicted: f64,
    /// Lower bound, never negative.
    pub lower: f64,
    /// Upper bound, never above the group total.
    pub upper: f64,
}

impl IntervalRow {
    /// Returns `true` if the bounds cross (`lower > upper`).
    pub fn is_inverted(&self) -> bool {
        self.lower > self.upper
    }
}

/// Per-category `(predicted, lower, upper)` with the intermediate quantities
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTable {
    rows: Vec<IntervalRow>,
    variances: Vec<f64>,
    margins: Vec<f64>,
    t_value: f64,
    total: f64,
    capped: Vec<usize>,
    widest: usize,
}

impl IntervalTable {
    /// Number of categories.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, in category order.
    pub fn rows(&self) -> &[IntervalRow] {
        &self.rows
    }

    /// Row for one category.
    ///
    /// # Panics
    ///
    /// Panics if `category >= len()`.
    pub fn row(&self, category: usize) -> IntervalRow {
        self.rows[category]
    }

    /// Point forecasts.
    pub fn predicted(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.predicted).collect()
    }

    /// Final lower bounds.
    pub fn lower(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.lower).collect()
    }

    /// Final upper bounds.
    pub fn upper(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.upper).collect()
    }

    /// Weighted variance per category after the zero-variance floor.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Margin of error per category.
    pub fn margins(&self) -> &[f64] {
        &self.margins
    }

    /// Student-t quantile used for the margins.
    pub fn t_value(&self) -> f64 {
        self.t_value
    }

    /// The known group total.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Categories whose raw upper bound exceeded the total and was capped.
    pub fn capped_categories(&self) -> &[usize] {
        &self.capped
    }

    /// The category with the widest margin, whose lower bound absorbs the
    /// remaining budget.
    pub fn widest_category(&self) -> usize {
        self.widest
    }

    /// Categories with `lower > upper` after reconciliation.
    ///
    /// Only possible when several categories share the widest margin.
    pub fn inverted_categories(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_inverted())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Computes the interval table from an already computed forecast.
pub(crate) fn compute_interval(
    forecast: &Forecast,
    config: &ForecastConfig,
) -> Result<IntervalTable, ForecastError> {
    let n = forecast.n_categories();
    let total = forecast.total();
    let predicted = forecast.predicted();

    let weights = normalize(&recency_weights(config.n_augmented()));

    let raw_variances: Vec<f64> = (0..n)
        .map(|c| {
            let series = forecast.category_series(c);
            let mean = weighted_mean(&series, &weights);
            weighted_variance(&series, &weights, mean)
        })
        .collect();

    if let Some((c, &v)) = raw_variances.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ForecastError::Overflow {
            quantity: format!("variance of category {c}"),
            value: v,
        });
    }

    let floor = min_positive(&raw_variances)
        .ok_or(ForecastError::DegenerateVariance { n_categories: n })?;
    let variances = floor_at(&raw_variances, floor);
    let n_floored = raw_variances.iter().filter(|&&v| v < floor).count();
    if n_floored > 0 {
        debug!(n_floored, floor, "raised zero-variance categories to floor");
    }

    let p = two_sided_quantile(config.confidence());
    let df = config.degrees_of_freedom();
    let t_value = student_t_quantile(p, df).ok_or_else(|| ForecastError::InvalidConfig {
        reason: format!("no Student-t quantile for p={p}, df={df}"),
    })?;

    let inflation = config.variance_inflation();
    let margins: Vec<f64> = variances
        .iter()
        .map(|&v| t_value * (v * inflation).sqrt())
        .collect();

    let mut lower: Vec<f64> = predicted
        .iter()
        .zip(&margins)
        .map(|(&p, &m)| (p - m).max(0.0))
        .collect();
    let mut upper: Vec<f64> = predicted
        .iter()
        .zip(&margins)
        .map(|(&p, &m)| p + m)
        .collect();

    // Cap from the raw upper bounds: categories equal to the total are in
    // neither set.
    let cap = total
        - (0..n)
            .filter(|&c| upper[c] < total)
            .map(|c| lower[c])
            .sum::<f64>();
    let capped: Vec<usize> = (0..n).filter(|&c| upper[c] > total).collect();
    for &c in &capped {
        upper[c] = cap;
    }
    if !capped.is_empty() {
        debug!(?capped, cap, "capped upper bounds at remaining budget");
    }

    let widest = argmax(&margins).ok_or(ForecastError::InvalidShape {
        n_categories: n,
        n_periods: config.n_periods(),
        expected_periods: config.n_periods(),
    })?;
    let max_margin = margins[widest];
    let budget = total
        - (0..n)
            .filter(|&c| margins[c] < max_margin)
            .map(|c| upper[c])
            .sum::<f64>();
    lower[widest] = budget.max(lower[widest]);
    debug!(widest, budget, t_value, "reconciled widest interval");

    let rows: Vec<IntervalRow> = (0..n)
        .map(|c| IntervalRow {
            predicted: predicted[c],
            lower: lower[c],
            upper: upper[c],
        })
        .collect();

    let table = IntervalTable {
        rows,
        variances,
        margins,
        t_value,
        total,
        capped,
        widest,
    };

    let inverted = table.inverted_categories();
    if !inverted.is_empty() {
        warn!(
            ?inverted,
            widest, "lower bound exceeds upper bound after reconciliation"
        );
    }

    Ok(table)
}
