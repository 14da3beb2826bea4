//! Statistical helper functions for gradecast.
//!
//! Everything here operates on short per-category series (one value per
//! period). The summation order is fixed to period order so that results are
//! reproducible bit for bit across calls.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Exponential recency weights for `n` periods, oldest first.
///
/// Period `j` gets `exp(j - (n - 1))`, so the most recent period has weight
/// 1.0 and the oldest `exp(-(n - 1))`. For `n = 3` this is
/// `[e^-2, e^-1, 1]`.
pub fn recency_weights(n: usize) -> Vec<f64> {
    let last = n.saturating_sub(1) as f64;
    (0..n).map(|j| (j as f64 - last).exp()).collect()
}

/// Scale weights so they sum to 1.0. Returns the input unchanged if the sum
/// is zero.
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return weights.to_vec();
    }
    weights.iter().map(|&w| w / total).collect()
}

/// `Σ x_j · w_j` over the common length of both slices.
pub fn weighted_sum(values: &[f64], weights: &[f64]) -> f64 {
    values
        .iter()
        .zip(weights.iter())
        .map(|(&x, &w)| x * w)
        .sum()
}

/// Weighted sum divided by the sum of the weights.
///
/// Used when the weights are not pre-normalized. Returns 0.0 if the weights
/// sum to zero.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    let weight_total: f64 = weights.iter().sum();
    if weight_total == 0.0 {
        return 0.0;
    }
    weighted_sum(values, weights) / weight_total
}

/// Weighted mean with weights that already sum to 1.0.
pub fn weighted_mean(values: &[f64], normalized: &[f64]) -> f64 {
    weighted_sum(values, normalized)
}

/// Population-style weighted variance `Σ w_j (x_j - mean)^2`.
///
/// `normalized` must sum to 1.0; no Bessel correction is applied.
pub fn weighted_variance(values: &[f64], normalized: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .zip(normalized.iter())
        .map(|(&x, &w)| w * (x - mean).powi(2))
        .sum()
}

/// Smallest strictly positive value, or `None` if there is none.
pub fn min_positive(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|&v| v > 0.0)
        .fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
}

/// Raise every value below `floor` up to it.
///
/// With `floor = min_positive(values)` this only touches exact zeros.
pub fn floor_at(values: &[f64], floor: f64) -> Vec<f64> {
    values.iter().map(|&v| v.max(floor)).collect()
}

/// Index of the first maximum. Returns `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Quantile `p` of the standard Student-t distribution with `df` degrees of
/// freedom.
///
/// Returns `None` if `p` is not in the open interval (0, 1) or `df` is not
/// strictly positive.
pub fn student_t_quantile(p: f64, df: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(dist.inverse_cdf(p))
}

/// Upper quantile used for a two-sided interval at `confidence`.
///
/// `confidence = 0.95` gives the 0.975 quantile.
pub fn two_sided_quantile(confidence: f64) -> f64 {
    1.0 - (1.0 - confidence) / 2.0
}
