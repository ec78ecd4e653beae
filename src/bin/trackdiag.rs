use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackdiag_rs::{
    analysis,
    views::ViewKind,
    AnalysisConfig, ChartConfig, NisEvaluator, OutputFormat, RunDirectory,
};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "trackdiag",
    version,
    about = "Consistency and trajectory plots for tracking filter logs",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot NIS per track from residuals.csv.
    Nis {
        #[command(flatten)]
        common: CommonArgs,

        /// Treat |det(S)| at or below this as singular
        #[arg(long, default_value_t = 0.0)]
        singular_tolerance: f64,
    },

    /// Plot truth against track estimates from truth.csv and tracks.csv.
    Tracks {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Run output directory
    #[arg(long = "in", value_name = "DIR")]
    input: PathBuf,

    /// Output path [default: plots/<view>_<run>.<ext>]
    #[arg(long)]
    out: Option<PathBuf>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Output format (png or json)
    #[arg(long, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,
}

impl CommonArgs {
    fn config(&self, evaluator: NisEvaluator) -> AnalysisConfig {
        AnalysisConfig {
            evaluator,
            chart: ChartConfig::with_size(self.width, self.height),
            title: self.title.clone(),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Respect RUST_LOG; default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Nis {
            common,
            singular_tolerance,
        } => cmd_plot(
            ViewKind::Nis,
            &common,
            NisEvaluator::with_singular_tolerance(singular_tolerance),
        ),
        Commands::Tracks { common } => cmd_plot(ViewKind::Tracks, &common, NisEvaluator::new()),
    }
}

fn cmd_plot(kind: ViewKind, args: &CommonArgs, evaluator: NisEvaluator) -> Result<()> {
    let run = RunDirectory::new(&args.input);
    let config = args.config(evaluator);
    info!("analysing {} ({})", run.root().display(), kind.file_prefix());

    let request = match kind {
        ViewKind::Nis => analysis::nis_request(&run, &config),
        ViewKind::Tracks => analysis::trajectory_request(&run, &config),
    }
    .with_context(|| format!("{} analysis of {} failed", kind.file_prefix(), run.root().display()))?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| run.default_output(kind, args.format));
    let written = analysis::write_request(&request, &out, args.format, &config.chart)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!("Wrote: {}", written.display());
    Ok(())
}
