//! evacuate — run a flood evacuation scenario end to end.
//!
//! ```text
//! evacuate run  --scenario demos/evacuate/scenario.toml
//! evacuate info --scenario demos/evacuate/scenario.toml
//! ```
//!
//! `run` loads the network, hazard, and candidates, simulates the configured
//! number of steps, streams both series to CSV in the output directory,
//! logs a summary, and renders a video if the scenario asks for one.
//! `info` stops after loading and filtering.

mod config;
mod progress;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use ev_agent::ShortestPathNavigator;
use ev_hazard::{CandidateSet, HazardFilter, HazardZone, load_candidates_csv, load_hazard_csv};
use ev_output::{CsvWriter, EvacuationSummary, RenderOptions, SeriesOutputObserver};
use ev_sim::EvacuationBuilder;
use ev_spatial::RoadNetwork;

use config::{NetworkSource, Scenario};
use progress::Progress;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate, export, and optionally render.
    Run {
        #[arg(long)]
        scenario: PathBuf,
    },

    /// Load the inputs and report what a run would start from.
    Info {
        #[arg(long)]
        scenario: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = Cli::parse();
    log::info!("{args:#?}");

    match args.command {
        Command::Run { scenario } => run_scenario(&scenario).map(|_| ()),
        Command::Info { scenario } => show_info(&scenario),
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

struct Inputs {
    network:    RoadNetwork,
    hazard:     HazardZone,
    candidates: CandidateSet,
}

fn load_network(source: &NetworkSource) -> Result<RoadNetwork> {
    match source {
        NetworkSource::Csv { nodes, edges } => ev_spatial::load_network_csv(nodes, edges)
            .with_context(|| format!("failed to load network from {nodes:?} / {edges:?}")),
        #[cfg(feature = "osm")]
        NetworkSource::Pbf(path) => ev_spatial::osm::load_walk_network_pbf(path)
            .with_context(|| format!("failed to load network from {path:?}")),
        #[cfg(not(feature = "osm"))]
        NetworkSource::Pbf(path) => {
            bail!("{path:?} is an OSM file; rebuild with `--features osm` to load it")
        }
    }
}

fn load_inputs(scenario: &Scenario) -> Result<Inputs> {
    let network = load_network(&scenario.network.source()?)?;
    let hazard = load_hazard_csv(&scenario.hazard.path, scenario.hazard.crs()?)
        .with_context(|| format!("failed to load hazard from {:?}", scenario.hazard.path))?;
    let candidates = load_candidates_csv(&scenario.candidates.path, scenario.candidates.crs()?)
        .with_context(|| format!("failed to load candidates from {:?}", scenario.candidates.path))?;
    Ok(Inputs { network, hazard, candidates })
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Run a scenario file; returns the summary for callers that want it.
fn run_scenario(path: &Path) -> Result<EvacuationSummary> {
    let scenario = Scenario::from_file(path)?;
    let Inputs { network, hazard, candidates } = load_inputs(&scenario)?;

    let mut builder =
        EvacuationBuilder::new(network, hazard, candidates, ShortestPathNavigator::walking());
    if let Some(target) = scenario.target {
        builder = builder.target(target);
    }
    if let Some(seed) = scenario.seed {
        builder = builder.seed(seed);
    }
    let mut run = builder.build().context("failed to set up the evacuation")?;

    std::fs::create_dir_all(&scenario.output_dir)
        .with_context(|| format!("failed to create {:?}", scenario.output_dir))?;
    let writer = CsvWriter::new(&scenario.output_dir).context("failed to open CSV output")?;
    let mut observer = Progress::new(SeriesOutputObserver::new(writer, run.network()), scenario.steps);

    let started = Instant::now();
    run.run_with(scenario.steps, &mut observer).context("simulation failed")?;
    if let Some(e) = observer.inner_mut().take_error() {
        return Err(e).context("failed to write CSV output");
    }
    log::info!("simulated {} steps in {:.2?}", run.steps_taken(), started.elapsed());

    write_sqlite(&scenario, &run)?;

    let summary = EvacuationSummary::from_collector(run.collector());
    log::info!("{summary}");

    if let Some(render) = &scenario.render {
        let options = RenderOptions {
            width: render.width,
            height: render.height,
            ..RenderOptions::default()
        };
        ev_output::render(run.network(), run.agent_series(), run.target(), &render.path, render.fps, &options)
            .with_context(|| format!("failed to render {:?}", render.path))?;
    }
    Ok(summary)
}

#[cfg(feature = "sqlite")]
fn write_sqlite<N: ev_agent::Navigator>(scenario: &Scenario, run: &ev_sim::Evacuation<N>) -> Result<()> {
    if !scenario.sqlite {
        return Ok(());
    }
    let mut writer = ev_output::SqliteWriter::new(&scenario.output_dir).context("failed to open output.db")?;
    ev_output::export_series(&mut writer, run.network(), run.collector())
        .context("failed to write output.db")
}

#[cfg(not(feature = "sqlite"))]
fn write_sqlite<N: ev_agent::Navigator>(scenario: &Scenario, _run: &ev_sim::Evacuation<N>) -> Result<()> {
    if scenario.sqlite {
        bail!("scenario asks for SQLite output; rebuild with `--features sqlite`");
    }
    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    let Inputs { network, hazard, candidates } = load_inputs(&scenario)?;

    log::info!("network: {} nodes, {} edges", network.node_count(), network.edge_count());
    if let Some((min, max)) = network.bounds() {
        log::info!("bounds: {min} .. {max}");
    }
    log::info!("hazard: {} polygon(s)", hazard.len());

    let kept = HazardFilter::new(&hazard)?.apply(&candidates)?;
    log::info!("candidates: {} inside the hazard of {}", kept.len(), candidates.len());

    match scenario.target {
        Some(id) => match network.node_by_external_id(id) {
            Some(node) => log::info!("target: external id {id} is {node}"),
            None => bail!("target {id} is not a node of the network"),
        },
        None => log::info!("target: chosen at random"),
    }
    Ok(())
}
