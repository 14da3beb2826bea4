use std::path::PathBuf;

use serde::Deserialize;

/// Top-level gradecast configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GradecastConfig {
    /// Input and output paths.
    #[serde(default)]
    pub io: IoToml,

    /// Forecast window and interval settings.
    #[serde(default)]
    pub forecast: ForecastToml,

    /// How planned heats turn into a total.
    #[serde(default)]
    pub plan: PlanToml,

    /// Report rendering settings.
    #[serde(default)]
    pub report: ReportToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub production: Option<PathBuf>,
    pub plan: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// `long` (default) or `wide` for spreadsheet exports.
    pub layout: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastToml {
    #[serde(default = "default_n_periods")]
    pub n_periods: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for ForecastToml {
    fn default() -> Self {
        Self {
            n_periods: default_n_periods(),
            confidence: default_confidence(),
        }
    }
}

fn default_n_periods() -> usize {
    3
}
fn default_confidence() -> f64 {
    0.95
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanToml {
    #[serde(default = "default_units_per_heat")]
    pub units_per_heat: f64,
}

impl Default for PlanToml {
    fn default() -> Self {
        Self {
            units_per_heat: default_units_per_heat(),
        }
    }
}

fn default_units_per_heat() -> f64 {
    100.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportToml {
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ReportToml {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            format: default_format(),
        }
    }
}

fn default_decimals() -> usize {
    2
}
fn default_format() -> String {
    "table".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: GradecastConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.forecast.n_periods, 3);
        assert!((cfg.forecast.confidence - 0.95).abs() < f64::EPSILON);
        assert!((cfg.plan.units_per_heat - 100.0).abs() < f64::EPSILON);
        assert_eq!(cfg.report.decimals, 2);
        assert_eq!(cfg.report.format, "table");
        assert!(cfg.io.production.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg: GradecastConfig = toml::from_str(
            r#"
            [io]
            production = "data/production.csv"
            plan = "data/plan.csv"
            layout = "wide"

            [forecast]
            confidence = 0.9

            [plan]
            units_per_heat = 95.5

            [report]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.io.production.as_deref(),
            Some(std::path::Path::new("data/production.csv"))
        );
        assert_eq!(cfg.forecast.n_periods, 3);
        assert!((cfg.forecast.confidence - 0.9).abs() < f64::EPSILON);
        assert!((cfg.plan.units_per_heat - 95.5).abs() < f64::EPSILON);
        assert_eq!(cfg.report.format, "json");
        assert_eq!(cfg.io.layout.as_deref(), Some("wide"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<GradecastConfig, _> = toml::from_str("[forecast]\nwindow = 3\n");
        assert!(result.is_err());
    }
}
