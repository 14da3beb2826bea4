//! Resolve CLI flags and the optional TOML file into one set of run settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use gradecast_forecast::ForecastConfig;
use gradecast_io::{GroupInput, IoError, Layout, build_groups, read_plan, read_production};

use crate::cli::RunArgs;
use crate::config::GradecastConfig;
use crate::convert;
use crate::report::ReportFormat;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG: &str = "gradecast.toml";

/// Everything a command needs, after CLI flags override the TOML file.
#[derive(Debug)]
pub struct Settings {
    pub production: PathBuf,
    pub plan: PathBuf,
    pub layout: Layout,
    pub output: Option<PathBuf>,
    pub forecast: ForecastConfig,
    pub units_per_heat: f64,
    pub format: ReportFormat,
    pub decimals: usize,
}

/// Load the TOML config: the explicit path must exist, the default path is
/// optional.
fn load_config(path: Option<&Path>) -> Result<GradecastConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(GradecastConfig::default());
            }
            default
        }
    };
    let toml_str = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse TOML config: {}", path.display()))
}

impl Settings {
    /// Merge CLI flags over the config file.
    pub fn resolve(args: RunArgs) -> Result<Self> {
        let config = load_config(args.config.as_deref())?;

        let production = args.production.or(config.io.production).ok_or_else(|| {
            anyhow!("no production path: set [io].production in config or use --production")
        })?;
        let plan = args
            .plan
            .or(config.io.plan)
            .ok_or_else(|| anyhow!("no plan path: set [io].plan in config or use --plan"))?;
        let format_name = args.format.unwrap_or(config.report.format);
        let layout_name = args.layout.or(config.io.layout);

        Ok(Self {
            production,
            plan,
            layout: convert::parse_layout(layout_name.as_deref())?,
            output: args.output.or(config.io.output),
            forecast: convert::build_forecast_config(&config.forecast)?,
            units_per_heat: convert::units_per_heat(&config.plan)?,
            format: convert::parse_format(&format_name)?,
            decimals: config.report.decimals,
        })
    }

    /// Read both CSV files and assemble every quality group.
    pub fn load_groups(&self) -> Result<BTreeMap<String, Result<GroupInput, IoError>>> {
        let production = read_production(&self.production, self.layout).with_context(|| {
            format!(
                "failed to read production history: {}",
                self.production.display()
            )
        })?;
        let plan = read_plan(&self.plan, self.layout)
            .with_context(|| format!("failed to read heat plan: {}", self.plan.display()))?;

        let groups = build_groups(
            &production,
            &plan,
            self.forecast.n_periods(),
            self.units_per_heat,
        );
        info!(n_groups = groups.len(), "assembled quality groups");
        Ok(groups)
    }

    /// Write the rendered report to the output file or stdout.
    pub fn emit(&self, rendered: &str) -> Result<()> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)
                    .with_context(|| format!("failed to write report: {}", path.display()))?;
                info!(path = %path.display(), "report written");
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}
