use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ship_balance::heuristic::Heuristic;
use ship_balance::manifest::{load_manifest, outbound_path, write_manifest, Manifest};
use ship_balance::session::SessionLog;
use ship_balance::{solve, SearchConfig, SolveOutcome, SolveReport};

#[derive(Debug, Parser)]
#[command(
    name = "ship-balance",
    version,
    about = "Plan crane moves that balance a ship's port and starboard weight."
)]
struct Cli {
    /// Manifest files to balance.
    #[arg(required = true)]
    manifests: Vec<PathBuf>,

    /// TOML file with search settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remaining-cost estimate used to order the search.
    #[arg(long, value_enum)]
    heuristic: Option<Heuristic>,

    /// Distinguish states that differ only in crane position
    /// (`--key-includes-crane=false` turns a config file's setting off).
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    key_includes_crane: Option<bool>,

    /// Give up after expanding this many states.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Write the balanced manifest next to each input as <name>OUTBOUND.txt.
    #[arg(long, default_value_t = false)]
    write_outbound: bool,

    /// Append the operator log to this file.
    #[arg(long)]
    session_log: Option<PathBuf>,
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)
                .with_context(|| format!("loading search config {}", path.display()))?,
            None => SearchConfig::default(),
        };
        if let Some(heuristic) = self.heuristic {
            config.heuristic = heuristic;
        }
        if let Some(include) = self.key_includes_crane {
            config.key_includes_crane = include;
        }
        if self.max_expansions.is_some() {
            config.max_expansions = self.max_expansions;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every manifest ended balanced.
fn run(cli: Cli) -> Result<bool> {
    let config = cli.search_config()?;
    let session = Mutex::new(match &cli.session_log {
        Some(path) => SessionLog::with_file(path)?,
        None => SessionLog::new(),
    });

    let results: Vec<Result<(String, bool)>> = cli
        .manifests
        .par_iter()
        .map(|path| balance_one(path, &config, cli.write_outbound, &session))
        .collect();

    let mut all_balanced = true;
    for (path, result) in cli.manifests.iter().zip(results) {
        let (summary, balanced) =
            result.with_context(|| format!("balancing {}", path.display()))?;
        print!("{summary}");
        all_balanced &= balanced;
    }
    Ok(all_balanced)
}

fn balance_one(
    path: &Path,
    config: &SearchConfig,
    write_outbound: bool,
    session: &Mutex<SessionLog>,
) -> Result<(String, bool)> {
    let manifest = load_manifest(path)?;
    let label = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    info!(manifest = %label, "solving");
    let started = Instant::now();
    let report = solve(manifest.grid().clone(), config);
    let elapsed = started.elapsed();
    info!(manifest = %label, elapsed_ms = elapsed.as_millis() as u64, "solved");
    session.lock().narrate(&label, &manifest, &report.outcome)?;

    if write_outbound {
        let final_grid = match &report.outcome {
            SolveOutcome::Solved(solution) => Some(&solution.final_grid),
            SolveOutcome::AlreadyBalanced => Some(manifest.grid()),
            SolveOutcome::NoSolution(_) => None,
        };
        if let Some(grid) = final_grid {
            let out = outbound_path(path);
            write_manifest(&out, &manifest.render(grid))?;
            info!(path = %out.display(), "wrote outbound manifest");
        }
    }

    let balanced = !matches!(report.outcome, SolveOutcome::NoSolution(_));
    Ok((summarize(&label, &manifest, &report, elapsed)?, balanced))
}

fn summarize(
    label: &str,
    manifest: &Manifest,
    report: &SolveReport,
    elapsed: Duration,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "== {label}")?;
    match &report.outcome {
        SolveOutcome::AlreadyBalanced => writeln!(out, "already balanced")?,
        SolveOutcome::NoSolution(reason) => writeln!(out, "no solution ({reason:?})")?,
        SolveOutcome::Solved(solution) => {
            for (step, planned) in solution.moves.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {} -> {}  {:<20} {:>6}  +{:<4} ={}",
                    step + 1,
                    planned.from,
                    planned.to,
                    manifest.name(planned.container),
                    planned.weight,
                    planned.step_cost,
                    planned.cumulative_cost,
                )?;
            }
            writeln!(
                out,
                "park +{}  total {}",
                solution.park_cost, solution.total_cost
            )?;
        }
    }
    writeln!(
        out,
        "expanded {} states in {} ms",
        report.stats.expanded,
        elapsed.as_millis()
    )?;
    Ok(out)
}
