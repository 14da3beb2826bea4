//! CSV readers for production history and the monthly heat plan.
//!
//! Both files are long-format with a header row:
//!
//! ```text
//! month,quality_group,grade,production
//! 2024-06-01,Rebar,B500A,8724
//! ```
//!
//! ```text
//! month,quality_group,heats
//! 2024-09,Rebar,232
//! ```
//!
//! Months may be written as `YYYY-MM-DD`, `YYYY-MM` or `Mon YY` (`Sep 24`)
//! and are normalised to the first day of the month.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::error::IoError;
use crate::validate::{ValidationCollector, check_group, check_quantity};
use crate::wide::{parse_plan_wide, parse_production_wide};

/// Column arrangement of an input CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One row per month with a `month` column (see the module docs).
    #[default]
    Long,
    /// Spreadsheet export with a title line and one column per month
    /// (see [`parse_production_wide`]).
    Wide,
}

/// Grade name used when the production file leaves the grade cell empty.
pub const UNKNOWN_GRADE: &str = "Unknown";

/// Production of one grade in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    /// First day of the production month.
    pub month: NaiveDate,
    /// Quality group the grade belongs to.
    pub quality_group: String,
    /// Steel grade.
    pub grade: String,
    /// Produced amount.
    pub production: f64,
}

/// Planned heats for one quality group in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    /// First day of the planned month.
    pub month: NaiveDate,
    /// Quality group.
    pub quality_group: String,
    /// Planned number of heats.
    pub heats: f64,
}

#[derive(Debug, Deserialize)]
struct ProductionRow {
    month: String,
    quality_group: String,
    #[serde(default)]
    grade: Option<String>,
    production: f64,
}

#[derive(Debug, Deserialize)]
struct PlanRow {
    month: String,
    quality_group: String,
    heats: f64,
}

/// Parse a month cell into the first day of that month.
///
/// # Errors
///
/// Returns [`IoError::InvalidMonth`] if none of the accepted layouts match.
pub fn parse_month(value: &str) -> Result<NaiveDate, IoError> {
    let s = value.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("01 {s}"), "%d %b %y"))
        .ok()
        .and_then(|d| d.with_day(1))
        .ok_or_else(|| IoError::InvalidMonth {
            value: value.to_string(),
        })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<BufReader<File>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IoError::Csv {
        reason: format!("failed to open {}: {e}", path.display()),
    })?;
    Ok(BufReader::new(file))
}

/// Parse production records from any CSV source.
///
/// # Errors
///
/// - [`IoError::Csv`] for malformed CSV or cells of the wrong type.
/// - [`IoError::Validation`] listing every invalid month, blank group, and
///   negative or non-finite production value.
pub fn parse_production<R: Read>(reader: R) -> Result<Vec<ProductionRecord>, IoError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut c = ValidationCollector::new();
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let raw: ProductionRow = row.deserialize(Some(&headers))?;

        check_group(&mut c, &raw.quality_group, line);
        check_quantity(&mut c, "production", raw.production, line);
        let month = match parse_month(&raw.month) {
            Ok(m) => m,
            Err(e) => {
                c.push(format!("{e} on line {line}"));
                continue;
            }
        };

        let grade = raw
            .grade
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_GRADE.to_string());

        records.push(ProductionRecord {
            month,
            quality_group: raw.quality_group,
            grade,
            production: raw.production,
        });
    }

    c.finish()?;
    Ok(records)
}

/// Parse heat-plan records from any CSV source.
///
/// # Errors
///
/// Same as [`parse_production`], with `heats` checked instead of
/// `production`.
pub fn parse_plan<R: Read>(reader: R) -> Result<Vec<PlanRecord>, IoError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut c = ValidationCollector::new();
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let raw: PlanRow = row.deserialize(Some(&headers))?;

        check_group(&mut c, &raw.quality_group, line);
        check_quantity(&mut c, "heats", raw.heats, line);
        match parse_month(&raw.month) {
            Ok(month) => records.push(PlanRecord {
                month,
                quality_group: raw.quality_group,
                heats: raw.heats,
            }),
            Err(e) => c.push(format!("{e} on line {line}")),
        }
    }

    c.finish()?;
    Ok(records)
}

/// Read production records from a CSV file in the given layout.
///
/// # Errors
///
/// [`IoError::FileNotFound`] if `path` does not exist, otherwise as
/// [`parse_production`] or [`parse_production_wide`].
pub fn read_production(path: &Path, layout: Layout) -> Result<Vec<ProductionRecord>, IoError> {
    let reader = open(path)?;
    let records = match layout {
        Layout::Long => parse_production(reader)?,
        Layout::Wide => parse_production_wide(reader)?,
    };
    info!(path = %path.display(), ?layout, n_records = records.len(), "read production history");
    Ok(records)
}

/// Read heat-plan records from a CSV file in the given layout.
///
/// # Errors
///
/// [`IoError::FileNotFound`] if `path` does not exist, otherwise as
/// [`parse_plan`] or [`parse_plan_wide`].
pub fn read_plan(path: &Path, layout: Layout) -> Result<Vec<PlanRecord>, IoError> {
    let reader = open(path)?;
    let records = match layout {
        Layout::Long => parse_plan(reader)?,
        Layout::Wide => parse_plan_wide(reader)?,
    };
    info!(path = %path.display(), ?layout, n_records = records.len(), "read heat plan");
    Ok(records)
}
