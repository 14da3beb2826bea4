//! Report structures and rendering for the CLI.

use std::fmt::{Display, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use gradecast_forecast::{Forecast, IntervalTable};
use gradecast_io::GroupInput;

/// Output layout of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned plain-text blocks, one per quality group.
    Table,
    /// Pretty-printed JSON array, one object per quality group.
    Json,
}

/// Round to a fixed number of decimals for display.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Interval for one grade.
#[derive(Debug, Serialize)]
pub struct GradeInterval {
    pub grade: String,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Intervals for one quality group, or the reason there are none.
#[derive(Debug, Serialize)]
pub struct IntervalReport {
    pub quality_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub grades: Vec<GradeInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntervalReport {
    /// Report for a group whose intervals were computed.
    pub fn from_table(input: &GroupInput, table: &IntervalTable, decimals: usize) -> Self {
        let grades = input
            .grades()
            .iter()
            .zip(table.rows())
            .map(|(grade, row)| GradeInterval {
                grade: grade.clone(),
                predicted: round_to(row.predicted, decimals),
                lower: round_to(row.lower, decimals),
                upper: round_to(row.upper, decimals),
            })
            .collect();
        Self {
            quality_group: input.quality_group().to_string(),
            forecast_month: Some(input.plan_month().format("%Y-%m").to_string()),
            total: Some(round_to(input.total(), decimals)),
            grades,
            error: None,
        }
    }

    /// Report for a group that could not be forecast.
    pub fn failed(group: &str, error: impl Display) -> Self {
        Self {
            quality_group: group.to_string(),
            forecast_month: None,
            total: None,
            grades: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// One labelled row of history-plus-forecast values.
#[derive(Debug, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// History plus forecast per grade and for the group total.
#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub quality_group: String,
    pub months: Vec<String>,
    pub series: Vec<NamedSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeriesReport {
    /// Report for a group whose forecast was computed. The group total is the
    /// last series.
    pub fn from_forecast(input: &GroupInput, forecast: &Forecast, decimals: usize) -> Self {
        let months = input
            .months()
            .iter()
            .chain(std::iter::once(&input.plan_month()))
            .map(|m| m.format("%Y-%m").to_string())
            .collect();
        let names = input
            .grades()
            .iter()
            .cloned()
            .chain(std::iter::once("Total".to_string()));
        let series = names
            .zip(forecast.augmented())
            .map(|(name, values)| NamedSeries {
                name,
                values: values.iter().map(|&v| round_to(v, decimals)).collect(),
            })
            .collect();
        Self {
            quality_group: input.quality_group().to_string(),
            months,
            series,
            error: None,
        }
    }

    /// Report for a group that could not be forecast.
    pub fn failed(group: &str, error: impl Display) -> Self {
        Self {
            quality_group: group.to_string(),
            months: Vec::new(),
            series: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

fn grade_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(0).max(5)
}

/// Render interval reports in the requested format.
pub fn render_intervals(
    reports: &[IntervalReport],
    format: ReportFormat,
    decimals: usize,
) -> Result<String> {
    if format == ReportFormat::Json {
        let mut json =
            serde_json::to_string_pretty(reports).context("failed to serialise report")?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    for report in reports {
        match (&report.error, report.forecast_month.as_deref(), report.total) {
            (Some(err), _, _) => {
                writeln!(out, "== {}", report.quality_group)?;
                writeln!(out, "error: {err}")?;
            }
            (None, month, total) => {
                writeln!(
                    out,
                    "== {} ({}, total {:.*})",
                    report.quality_group,
                    month.unwrap_or("-"),
                    decimals,
                    total.unwrap_or(0.0)
                )?;
                let w = grade_width(report.grades.iter().map(|g| g.grade.as_str()));
                writeln!(
                    out,
                    "{:<w$}  {:>12}  {:>12}  {:>12}",
                    "grade", "predicted", "lower", "upper"
                )?;
                for g in &report.grades {
                    writeln!(
                        out,
                        "{:<w$}  {:>12.*}  {:>12.*}  {:>12.*}",
                        g.grade, decimals, g.predicted, decimals, g.lower, decimals, g.upper
                    )?;
                }
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Render series reports in the requested format.
pub fn render_series(
    reports: &[SeriesReport],
    format: ReportFormat,
    decimals: usize,
) -> Result<String> {
    if format == ReportFormat::Json {
        let mut json =
            serde_json::to_string_pretty(reports).context("failed to serialise report")?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    for report in reports {
        writeln!(out, "== {}", report.quality_group)?;
        if let Some(err) = &report.error {
            writeln!(out, "error: {err}")?;
            out.push('\n');
            continue;
        }
        let w = grade_width(report.series.iter().map(|s| s.name.as_str()));
        write!(out, "{:<w$}", "grade")?;
        for m in &report.months {
            write!(out, "  {m:>12}")?;
        }
        out.push('\n');
        for s in &report.series {
            write!(out, "{:<w$}", s.name)?;
            for v in &s.values {
                write!(out, "  {v:>12.decimals$}")?;
            }
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}
