//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use gradecast_forecast::ForecastConfig;
use gradecast_io::Layout;

use crate::config::{ForecastToml, PlanToml};
use crate::report::ReportFormat;

/// Parses a report format name into the corresponding enum variant.
pub fn parse_format(s: &str) -> Result<ReportFormat> {
    match s.to_lowercase().as_str() {
        "table" => Ok(ReportFormat::Table),
        "json" => Ok(ReportFormat::Json),
        other => bail!("unknown report format: {other:?}"),
    }
}

/// Parses an input layout name; absent means long format.
pub fn parse_layout(s: Option<&str>) -> Result<Layout> {
    match s.map(str::to_lowercase).as_deref() {
        None | Some("long") => Ok(Layout::Long),
        Some("wide") => Ok(Layout::Wide),
        Some(other) => bail!("unknown input layout: {other:?}"),
    }
}

/// Builds a validated [`ForecastConfig`] from the TOML forecast section.
pub fn build_forecast_config(t: &ForecastToml) -> Result<ForecastConfig> {
    let cfg = ForecastConfig::new()
        .with_n_periods(t.n_periods)
        .with_confidence(t.confidence);
    cfg.validate()?;
    Ok(cfg)
}

/// Returns the per-heat multiplier after checking it is usable.
pub fn units_per_heat(t: &PlanToml) -> Result<f64> {
    if !t.units_per_heat.is_finite() || t.units_per_heat <= 0.0 {
        bail!(
            "units_per_heat must be finite and > 0, got {}",
            t.units_per_heat
        );
    }
    Ok(t.units_per_heat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(parse_format("table").unwrap(), ReportFormat::Table);
        assert_eq!(parse_format("JSON").unwrap(), ReportFormat::Json);
        assert!(parse_format("html").is_err());
    }

    #[test]
    fn layout_names() {
        assert_eq!(parse_layout(None).unwrap(), Layout::Long);
        assert_eq!(parse_layout(Some("Wide")).unwrap(), Layout::Wide);
        assert!(parse_layout(Some("tall")).is_err());
    }

    #[test]
    fn forecast_config_from_toml() {
        let cfg = build_forecast_config(&ForecastToml {
            n_periods: 4,
            confidence: 0.9,
        })
        .unwrap();
        assert_eq!(cfg.n_periods(), 4);
        assert!((cfg.confidence() - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn forecast_config_rejects_bad_confidence() {
        let result = build_forecast_config(&ForecastToml {
            n_periods: 3,
            confidence: 95.0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn units_per_heat_checked() {
        assert!(units_per_heat(&PlanToml { units_per_heat: 100.0 }).is_ok());
        assert!(units_per_heat(&PlanToml { units_per_heat: 0.0 }).is_err());
        assert!(
            units_per_heat(&PlanToml {
                units_per_heat: f64::NAN
            })
            .is_err()
        );
    }
}
