use std::{fs, path::Path, process::ExitCode};

use chrono::Utc;
use clap::Parser;
use mmr_processor::{
    error::{MmrError, Result},
    model::config::ProcessorConfig,
    processor::Processor,
    utils::{progress_utils::progress_style, simulation::Simulation}
};
use tracing::{error, info, info_span};
use tracing_indicatif::{span_ext::IndicatifSpanExt, IndicatifLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::Args;

mod args;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log lines go through the indicatif writer so they never tear the progress bar.
fn init_tracing(level: &str) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ProcessorConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(ProcessorConfig::default());
    };

    let raw = fs::read_to_string(path)
        .map_err(|e| MmrError::Configuration(format!("cannot read {}: {}", path.display(), e)))?;
    let config = serde_json::from_str(&raw)
        .map_err(|e| MmrError::Configuration(format!("cannot parse {}: {}", path.display(), e)))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let processor = Processor::new(load_config(args.config.as_deref())?)?;
    let mut simulation = Simulation::new(processor, args.seed, Utc::now());

    simulation.populate(args.players)?;
    info!("{} players queued", simulation.processor().pool_size());

    let span = info_span!("simulation");
    span.pb_set_style(&progress_style());
    span.pb_set_length(args.rounds as u64);
    span.pb_set_message("Simulating rounds");

    {
        let _entered = span.enter();
        for _ in 0..args.rounds {
            simulation.step()?;
            span.pb_inc(1);
        }
    }

    let summary = simulation.summary();
    info!(
        "{} matches formed over {} rounds, average quality {:.3}",
        summary.matches_formed, summary.rounds, summary.average_quality
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize the summary: {}", e)
    }

    Ok(())
}
