use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use route_solver::{config, report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "route-solver", version, about)]
struct Cli {
    /// Topology description: INI sections, or TOML/JSON by .toml/.json extension
    topology: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write a Graphviz description of the topology to this file
    #[arg(long)]
    dot: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut context = config::load(&cli.topology)
        .with_context(|| format!("failed to load topology {}", cli.topology.display()))?;

    let summary = context
        .derive_routes()
        .context("route derivation failed")?;
    info!(
        "{} candidates: {} appended, {} replaced, {} rejected",
        summary.candidates, summary.appended, summary.replaced, summary.rejected
    );

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&context.routers)),
        OutputFormat::Json => println!("{}", report::render_json(&context.routers)?),
    }

    if let Some(path) = &cli.dot {
        std::fs::write(path, report::render_dot(&context.graph))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Topology diagram written to {}", path.display());
    }

    Ok(())
}
