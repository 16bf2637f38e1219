use std::path::PathBuf;

use clap::Parser;
use rowdrag_core::logging::DEFAULT_FILTER;
use rowdrag_widgets::reorder::ReorderConfig;
use tracing_subscriber::EnvFilter;

use crate::error::{DemoError, Result};
use crate::scenario::{self, Report, Scenario};

#[derive(Debug, Parser)]
#[command(
    name = "rowdrag-demo",
    about = "Replay scripted drag-to-reorder sessions over a city list",
    version
)]
pub struct Cli {
    /// TOML file with reorder settings; unset keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long)]
    pub json_logs: bool,

    /// Script to replay.
    #[arg(long, value_enum, default_value_t = Scenario::Drag)]
    pub scenario: Scenario,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;
    let report = run(&cli)?;
    print_report(&report);
    Ok(())
}

pub fn run(cli: &Cli) -> Result<Report> {
    let config = load_config(cli.config.as_ref())?;
    scenario::run(cli.scenario, &config)
}

fn load_config(path: Option<&PathBuf>) -> Result<ReorderConfig> {
    let Some(path) = path else {
        return Ok(ReorderConfig::default());
    };
    ReorderConfig::from_toml_file(path).map_err(|source| DemoError::Config {
        path: path.clone(),
        source,
    })
}

fn init_logging(json: bool) -> Result<()> {
    let installed = if json {
        rowdrag_core::logging::init_json_subscriber()
    } else {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .is_ok()
    };
    if installed {
        Ok(())
    } else {
        Err(DemoError::LoggingInit)
    }
}

fn print_report(report: &Report) {
    println!("scenario: {}", report.scenario.name());
    for (row, item) in report.items.iter().enumerate() {
        let label = if item.is_empty() { "(spacer)" } else { item.as_str() };
        println!("{row:>3}  {label}");
    }
    if !report.rejections.is_empty() {
        println!("rejected presses: {:?}", report.rejections);
    }
    println!("scroll offset: {}", report.final_offset);
}
