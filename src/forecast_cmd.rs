//! Forecast command: history plus one-step reconciled forecast per grade.

use anyhow::Result;
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use gradecast_forecast::forecast;

use crate::cli::RunArgs;
use crate::report::{SeriesReport, render_series};
use crate::settings::Settings;

/// Run the point-forecast pipeline over every quality group.
pub fn run(args: RunArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();
    let settings = Settings::resolve(args)?;
    let groups: Vec<_> = settings.load_groups()?.into_iter().collect();

    let reports: Vec<SeriesReport> = groups
        .into_par_iter()
        .map(|(name, group)| {
            let _span = info_span!("group", quality_group = %name).entered();
            let result = group
                .map_err(|e| e.to_string())
                .and_then(|input| {
                    forecast(input.history(), input.total(), &settings.forecast)
                        .map(|fc| SeriesReport::from_forecast(&input, &fc, settings.decimals))
                        .map_err(|e| e.to_string())
                });
            result.unwrap_or_else(|err| {
                warn!(error = %err, "quality group skipped");
                SeriesReport::failed(&name, err)
            })
        })
        .collect();

    let n_failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!(n_groups = reports.len(), n_failed, "forecasts computed");

    let rendered = render_series(&reports, settings.format, settings.decimals)?;
    settings.emit(&rendered)
}
