//! Categories x periods production history.

use crate::error::ForecastError;

/// Non-negative production history for one group, stored row-major.
///
/// Each row is one category (grade), each column one historical period,
/// oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryMatrix {
    values: Vec<f64>,
    n_categories: usize,
    n_periods: usize,
}

impl HistoryMatrix {
    /// Builds a matrix from row-major `values`.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::InvalidShape`] if there are no categories or no
    ///   periods, or `values.len() != n_categories * n_periods`.
    /// - [`ForecastError::InvalidValue`] if any entry is negative or not finite.
    pub fn new(
        values: Vec<f64>,
        n_categories: usize,
        n_periods: usize,
    ) -> Result<Self, ForecastError> {
        if n_categories == 0 || n_periods == 0 || values.len() != n_categories * n_periods {
            return Err(ForecastError::InvalidShape {
                n_categories,
                n_periods,
                expected_periods: n_periods.max(1),
            });
        }

        for (idx, &v) in values.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                return Err(ForecastError::InvalidValue {
                    category: idx / n_periods,
                    period: idx % n_periods,
                    value: v,
                });
            }
        }

        Ok(Self {
            values,
            n_categories,
            n_periods,
        })
    }

    /// Builds a matrix from one slice per category.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::RaggedHistory`] if rows differ in length, plus
    /// everything [`HistoryMatrix::new`] can return.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ForecastError> {
        let n_periods = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * n_periods);
        for (category, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_periods {
                return Err(ForecastError::RaggedHistory {
                    category,
                    len: row.len(),
                    expected: n_periods,
                });
            }
            values.extend_from_slice(row);
        }
        Self::new(values, rows.len(), n_periods)
    }

    /// Number of categories (rows).
    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    /// Number of historical periods (columns).
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// History of one category, oldest period first.
    ///
    /// # Panics
    ///
    /// Panics if `category >= n_categories()`.
    pub fn row(&self, category: usize) -> &[f64] {
        let start = category * self.n_periods;
        &self.values[start..start + self.n_periods]
    }

    /// Iterator over category rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_periods)
    }

    /// Group total per period (column-wise sum over categories).
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_periods];
        for row in self.rows() {
            for (s, &v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        sums
    }

    /// Row-major backing slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
