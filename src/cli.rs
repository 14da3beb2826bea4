use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gradecast steel grade production forecaster.
#[derive(Parser)]
#[command(
    name = "gradecast",
    version,
    about = "Per-grade production forecasts reconciled to the planned total"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Predict each grade with a 95% interval, per quality group.
    Predict(RunArgs),
    /// Emit history plus forecast series per quality group, for plotting.
    Forecast(RunArgs),
}

/// Arguments shared by `predict` and `forecast`.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file (optional).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override production history CSV path from config.
    #[arg(short, long)]
    pub production: Option<PathBuf>,

    /// Override heat plan CSV path from config.
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Override input CSV layout from config (`long` or `wide`).
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Override report format from config (`table` or `json`).
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
