mod inputs;
mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use inputs::{
    ConstraintOverrides, apply_overrides, load_catalog, load_config, load_constraints, load_state,
};
use prospect_core::{
    CancellationToken, Catalog, OptimizerConfig, PlannerState, compare_plans,
    compute_stat_breakdown_with, optimize_inventory_async,
};
use reports::OptimizeReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanMode {
    /// Show the stat pipeline for the current plan
    Stats,
    /// Search for a better loadout and museum layout
    Optimize,
}

#[derive(Debug, Parser)]
#[command(name = "prospect-cli", version = "0.1.0")]
#[command(about = "Stat breakdowns and loadout optimization for Prospect Planner")]
struct Args {
    /// What to compute
    #[arg(long, value_enum, default_value_t = PlanMode::Optimize)]
    mode: PlanMode,

    /// Catalog JSON (defaults to the bundled sample catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Planner state JSON with the current loadout and museum
    #[arg(long)]
    state: Option<PathBuf>,

    /// Optimization constraints JSON
    #[arg(long)]
    constraints: Option<PathBuf>,

    /// Optimizer tuning JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum number of equipped rings
    #[arg(long)]
    min_rings: Option<usize>,

    /// Maximum number of equipped rings
    #[arg(long)]
    max_rings: Option<usize>,

    /// Allowed jewelry and tool rarities (comma-separated)
    #[arg(long)]
    rarities: Option<String>,

    /// Keep the current museum instead of recomputing its layout
    #[arg(long)]
    keep_museum: bool,

    /// Prefer enhanced stat tables when ranking jewelry
    #[arg(long)]
    prefer_enhanced: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConstraintOverrides {
        ConstraintOverrides {
            min_rings: self.min_rings,
            max_rings: self.max_rings,
            rarities: self.rarities.clone(),
            keep_museum: self.keep_museum,
            prefer_enhanced: self.prefer_enhanced,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let catalog = load_catalog(args.catalog.as_deref())?;
    let state = load_state(args.state.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    log::debug!(
        "loaded catalog with {} items and {} ores",
        catalog.items().len(),
        catalog.ores().len()
    );

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.mode {
        PlanMode::Stats => write_stats(&args, &catalog, &state, &config, &mut output_target)?,
        PlanMode::Optimize => {
            run_optimizer(&args, &catalog, &state, &config, &mut output_target).await?;
        }
    }

    if args.report == "console" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "⛏️  Prospect Planner".bright_cyan().bold());
    println!("{}", "====================".cyan());
}

fn write_stats(
    args: &Args,
    catalog: &Catalog,
    state: &PlannerState,
    config: &OptimizerConfig,
    out: &mut OutputTarget,
) -> Result<()> {
    let breakdown =
        compute_stat_breakdown_with(catalog, &state.loadout, &state.museum, &config.efficiency);
    match args.report.as_str() {
        "json" => reports::generate_json_report(out, &breakdown),
        "markdown" => reports::generate_stats_markdown_report(out, &breakdown),
        _ => reports::generate_stats_console_report(out, &breakdown),
    }
}

async fn run_optimizer(
    args: &Args,
    catalog: &Catalog,
    state: &PlannerState,
    config: &OptimizerConfig,
    out: &mut OutputTarget,
) -> Result<()> {
    let constraints = apply_overrides(load_constraints(args.constraints.as_deref())?, &args.overrides())?;

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received; finishing with the best plan so far");
            ctrl_c.cancel();
        }
    });

    let mut progress = |percent: u8, stage: &str| log::info!("{stage}: {percent}%");
    let result = optimize_inventory_async(
        catalog,
        &constraints,
        &state.loadout,
        &state.museum,
        config,
        &mut progress,
        cancellation,
    )
    .await
    .context("optimizer rejected the constraints")?;

    let comparison = compare_plans(
        catalog,
        &config.efficiency,
        (&state.loadout, &state.museum),
        (&result.loadout, &result.museum),
    );

    match args.report.as_str() {
        "json" => reports::generate_json_report(
            out,
            &OptimizeReport {
                result: &result,
                comparison: &comparison,
            },
        ),
        "markdown" => reports::generate_optimize_markdown_report(out, &result, &comparison),
        _ => reports::generate_optimize_console_report(out, &result, &comparison),
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
