//! Assemble per-group history matrices and totals from parsed records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Months, NaiveDate};
use gradecast_forecast::HistoryMatrix;
use tracing::debug;

use crate::error::IoError;
use crate::records::{PlanRecord, ProductionRecord};

/// Everything the forecaster needs for one quality group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInput {
    quality_group: String,
    grades: Vec<String>,
    months: Vec<NaiveDate>,
    history: HistoryMatrix,
    plan_month: NaiveDate,
    heats: f64,
    total: f64,
}

impl GroupInput {
    /// Name of the quality group.
    pub fn quality_group(&self) -> &str {
        &self.quality_group
    }

    /// Grade names, one per history row.
    pub fn grades(&self) -> &[String] {
        &self.grades
    }

    /// History months, oldest first, one per history column.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Grades x months production matrix.
    pub fn history(&self) -> &HistoryMatrix {
        &self.history
    }

    /// Month of the plan entry the total was taken from.
    pub fn plan_month(&self) -> NaiveDate {
        self.plan_month
    }

    /// Planned heats for the forecast month.
    pub fn heats(&self) -> f64 {
        self.heats
    }

    /// Known total for the forecast month (`heats * units_per_heat`).
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Sorted, de-duplicated quality group names present in the production data.
pub fn group_names(production: &[ProductionRecord]) -> Vec<String> {
    production
        .iter()
        .map(|r| r.quality_group.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Plan entry for `group`: the month right after `last_month` if planned,
/// otherwise the latest planned month. Later rows win over earlier rows for
/// the same month.
fn select_plan<'a>(
    group: &str,
    plan: &'a [PlanRecord],
    last_month: NaiveDate,
) -> Option<&'a PlanRecord> {
    let entries: Vec<&PlanRecord> = plan.iter().filter(|p| p.quality_group == group).collect();
    let next = last_month.checked_add_months(Months::new(1));
    entries
        .iter()
        .rev()
        .find(|p| Some(p.month) == next)
        .or_else(|| entries.iter().max_by_key(|p| p.month))
        .copied()
}

/// Build the forecaster input for one quality group.
///
/// The window is the `n_periods` most recent months with any production in
/// the group. Grades keep their order of first appearance; cells with no
/// record are zero and repeated records for the same cell are summed.
///
/// # Errors
///
/// - [`IoError::InsufficientHistory`] if the group has fewer than
///   `n_periods` months.
/// - [`IoError::MissingPlan`] if the plan has no entry for the group.
/// - [`IoError::Forecast`] if the assembled matrix is rejected.
pub fn build_group(
    group: &str,
    production: &[ProductionRecord],
    plan: &[PlanRecord],
    n_periods: usize,
    units_per_heat: f64,
) -> Result<GroupInput, IoError> {
    let records: Vec<&ProductionRecord> = production
        .iter()
        .filter(|r| r.quality_group == group)
        .collect();

    let all_months: BTreeSet<NaiveDate> = records.iter().map(|r| r.month).collect();
    if all_months.len() < n_periods {
        return Err(IoError::InsufficientHistory {
            group: group.to_string(),
            available: all_months.len(),
            required: n_periods,
        });
    }
    let months: Vec<NaiveDate> = all_months
        .iter()
        .copied()
        .skip(all_months.len() - n_periods)
        .collect();

    let mut grades: Vec<String> = Vec::new();
    for r in &records {
        if !grades.contains(&r.grade) {
            grades.push(r.grade.clone());
        }
    }

    let mut values = vec![0.0; grades.len() * n_periods];
    let mut filled: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for r in &records {
        let Some(col) = months.iter().position(|&m| m == r.month) else {
            continue;
        };
        let Some(row) = grades.iter().position(|g| g == &r.grade) else {
            continue;
        };
        values[row * n_periods + col] += r.production;
        *filled.entry((row, col)).or_default() += 1;
    }
    let n_merged = filled.values().filter(|&&n| n > 1).count();
    let n_missing = grades.len() * n_periods - filled.len();

    let history = HistoryMatrix::new(values, grades.len(), n_periods)?;

    let last_month = months[months.len() - 1];
    let entry = select_plan(group, plan, last_month).ok_or_else(|| IoError::MissingPlan {
        group: group.to_string(),
    })?;

    debug!(
        group,
        n_grades = grades.len(),
        n_missing,
        n_merged,
        plan_month = %entry.month,
        heats = entry.heats,
        "assembled group history"
    );

    Ok(GroupInput {
        quality_group: group.to_string(),
        grades,
        months,
        history,
        plan_month: entry.month,
        heats: entry.heats,
        total: entry.heats * units_per_heat,
    })
}

/// Build inputs for every quality group in the production data.
///
/// Each group succeeds or fails on its own.
pub fn build_groups(
    production: &[ProductionRecord],
    plan: &[PlanRecord],
    n_periods: usize,
    units_per_heat: f64,
) -> BTreeMap<String, Result<GroupInput, IoError>> {
    group_names(production)
        .into_iter()
        .map(|g| {
            let input = build_group(&g, production, plan, n_periods, units_per_heat);
            (g, input)
        })
        .collect()
}
