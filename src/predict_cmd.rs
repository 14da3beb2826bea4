//! Predict command: per-grade forecasts with reconciled prediction intervals.

use anyhow::Result;
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use gradecast_forecast::interval;

use crate::cli::RunArgs;
use crate::report::{IntervalReport, render_intervals};
use crate::settings::Settings;

/// Run the interval pipeline over every quality group.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("predict").entered();
    let settings = Settings::resolve(args)?;
    let groups: Vec<_> = settings.load_groups()?.into_iter().collect();

    let reports: Vec<IntervalReport> = groups
        .into_par_iter()
        .map(|(name, group)| {
            let _span = info_span!("group", quality_group = %name).entered();
            let result = group
                .map_err(|e| e.to_string())
                .and_then(|input| {
                    interval(input.history(), input.total(), &settings.forecast)
                        .map(|table| IntervalReport::from_table(&input, &table, settings.decimals))
                        .map_err(|e| e.to_string())
                });
            result.unwrap_or_else(|err| {
                warn!(error = %err, "quality group skipped");
                IntervalReport::failed(&name, err)
            })
        })
        .collect();

    let n_failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!(
        n_groups = reports.len(),
        n_failed, "prediction intervals computed"
    );

    let rendered = render_intervals(&reports, settings.format, settings.decimals)?;
    settings.emit(&rendered)
}
