//! Readers for wide spreadsheet exports.
//!
//! The planning office exports both files with a title line, a header line,
//! and one column per month:
//!
//! ```text
//! Steel grade production (tons)
//! Quality group,Grade,Jun 24,Jul 24,Aug 24
//! Rebar,B500A,8724,9230,8989
//! ,B500B,10880,11030,10822
//! ```
//!
//! ```text
//! Monthly heat plan
//! Quality:,Jun 24,Jul 24,Aug 24,Sep 24
//! Rebar,240,251,238,232
//! ```
//!
//! A blank `Quality group` cell continues the group of the row above. Blank
//! month cells are skipped, not read as zero. Any header cell that parses as a
//! month is a month column; other columns are ignored.

use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::IoError;
use crate::records::{PlanRecord, ProductionRecord, UNKNOWN_GRADE, parse_month};
use crate::validate::{ValidationCollector, check_quantity};

const PRODUCTION_GROUP: &str = "Quality group";
const PRODUCTION_GRADE: &str = "Grade";
const PLAN_GROUP: &str = "Quality:";

/// Header line of a wide file, resolved to column positions.
struct WideHeader {
    record: StringRecord,
    months: Vec<(usize, NaiveDate)>,
}

impl WideHeader {
    fn column(&self, name: &str) -> Result<usize, IoError> {
        self.record
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| IoError::MissingColumn {
                column: name.to_string(),
            })
    }
}

fn wide_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Skip the title line and resolve the header line.
fn read_header<I>(records: &mut I) -> Result<WideHeader, IoError>
where
    I: Iterator<Item = Result<StringRecord, csv::Error>>,
{
    let _title = records.next().transpose()?;
    let record = records
        .next()
        .transpose()?
        .ok_or_else(|| IoError::Csv {
            reason: "no header line after the title line".to_string(),
        })?;
    let months: Vec<(usize, NaiveDate)> = record
        .iter()
        .enumerate()
        .filter_map(|(i, h)| parse_month(h).ok().map(|m| (i, m)))
        .collect();
    if months.is_empty() {
        return Err(IoError::MissingColumn {
            column: "month (e.g. \"Sep 24\")".to_string(),
        });
    }
    Ok(WideHeader { record, months })
}

fn cell(row: &StringRecord, col: usize) -> &str {
    row.get(col).unwrap_or("")
}

/// Non-blank month cells of `row` as `(month, value)`, with unparseable
/// cells reported to `c`.
fn month_values(
    c: &mut ValidationCollector,
    header: &WideHeader,
    row: &StringRecord,
    field: &str,
    line: u64,
) -> Vec<(NaiveDate, f64)> {
    let mut values = Vec::new();
    for &(col, month) in &header.months {
        let raw = cell(row, col);
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(v) => {
                check_quantity(c, field, v, line);
                values.push((month, v));
            }
            Err(_) => c.push(format!("invalid {field} {raw:?} on line {line}")),
        }
    }
    values
}

/// Parse a wide production export.
///
/// # Errors
///
/// - [`IoError::MissingColumn`] if the header lacks `Quality group`, `Grade`
///   or any month column.
/// - [`IoError::Csv`] for malformed CSV.
/// - [`IoError::Validation`] listing unparseable or negative cells and rows
///   before the first quality group.
pub fn parse_production_wide<R: Read>(reader: R) -> Result<Vec<ProductionRecord>, IoError> {
    let mut rdr = wide_reader(reader);
    let mut rows = rdr.records();
    let header = read_header(&mut rows)?;
    let group_col = header.column(PRODUCTION_GROUP)?;
    let grade_col = header.column(PRODUCTION_GRADE)?;

    let mut c = ValidationCollector::new();
    let mut records = Vec::new();
    let mut current_group: Option<String> = None;

    for result in rows {
        let row = result?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let line = row.position().map_or(0, |p| p.line());

        let group_cell = cell(&row, group_col);
        if !group_cell.is_empty() {
            current_group = Some(group_cell.to_string());
        }
        let Some(group) = current_group.as_deref() else {
            c.push(format!("no quality group on or above line {line}"));
            continue;
        };

        let grade = match cell(&row, grade_col) {
            "" => UNKNOWN_GRADE,
            g => g,
        };
        for (month, production) in month_values(&mut c, &header, &row, "production", line) {
            records.push(ProductionRecord {
                month,
                quality_group: group.to_string(),
                grade: grade.to_string(),
                production,
            });
        }
    }

    c.finish()?;
    Ok(records)
}

/// Parse a wide heat-plan export.
///
/// Rows without a `Quality:` cell are ignored when they have no month values
/// and rejected otherwise.
///
/// # Errors
///
/// As [`parse_production_wide`], with `Quality:` as the group column and
/// `heats` checked instead of `production`.
pub fn parse_plan_wide<R: Read>(reader: R) -> Result<Vec<PlanRecord>, IoError> {
    let mut rdr = wide_reader(reader);
    let mut rows = rdr.records();
    let header = read_header(&mut rows)?;
    let group_col = header.column(PLAN_GROUP)?;

    let mut c = ValidationCollector::new();
    let mut records = Vec::new();

    for result in rows {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let values = month_values(&mut c, &header, &row, "heats", line);

        let group = cell(&row, group_col);
        if group.is_empty() {
            if !values.is_empty() {
                c.push(format!("empty quality group on line {line}"));
            }
            continue;
        }

        records.extend(values.into_iter().map(|(month, heats)| PlanRecord {
            month,
            quality_group: group.to_string(),
            heats,
        }));
    }

    c.finish()?;
    Ok(records)
}
