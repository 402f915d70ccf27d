//! Graph Generator - Render charts from CSV data
//!
//! Reads a CSV file and a YAML config listing graphs, then writes one image
//! per graph. Line, marker, scatter and bar charts are supported.

mod charts;
mod config;
mod data;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use env_logger::Env;
use log::error;
use runner::{Inputs, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code when at least one graph failed
const EXIT_GRAPH_FAILED: u8 = 1;
/// Exit code when the config or input data could not be loaded
const EXIT_FATAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "graph_generator", version, about = "Generate graphs from CSV data")]
struct Cli {
    /// Input CSV file path (default: data/examples.csv and data/fibonacci.csv)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, value_name = "PATH", default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_GRAPH_FAILED),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = Config::load(&cli.config).context("Cannot load graph config")?;
    let inputs = Inputs::load(cli.input.as_deref()).context("Cannot load input data")?;
    Ok(runner::run(&inputs, config.graphs))
}
