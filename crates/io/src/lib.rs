//! # gradecast-io
//!
//! Read production history and monthly heat plans from CSV, either long
//! format or wide spreadsheet exports ([`Layout`]), and assemble them into
//! one [`HistoryMatrix`](gradecast_forecast::HistoryMatrix) plus known total
//! per quality group.

mod error;
mod group;
mod records;
mod validate;
mod wide;

pub use error::IoError;
pub use group::{GroupInput, build_group, build_groups, group_names};
pub use records::{
    Layout, PlanRecord, ProductionRecord, UNKNOWN_GRADE, parse_month, parse_plan,
    parse_production, read_plan, read_production,
};
pub use wide::{parse_plan_wide, parse_production_wide};
