// Command-line entry point for the repository quality study.
//
// Each subcommand runs one pipeline stage; `run` chains all of them.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;

use repo_quality_study::{DiscoveryLayout, Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "repo-quality-study",
    version,
    about = "Popularity, maturity, activity and size versus code quality"
)]
struct Cli {
    /// TOML configuration file; defaults apply to anything it leaves out.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Directory every stage writes into.
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch repository metadata and write the process-metric table.
    Collect(CollectArgs),
    /// Consolidate CK class metrics into unit and summary tables.
    Consolidate(QualityArgs),
    /// Join process metrics and quality summaries into the final dataset.
    Reconcile(ReconcileArgs),
    /// Descriptive statistics and rank correlations of the final dataset.
    Report(ReportArgs),
    /// All stages in order.
    Run {
        #[command(flatten)]
        collect: CollectArgs,
        #[command(flatten)]
        quality: QualityArgs,
        #[command(flatten)]
        reconcile: ReconcileArgs,
        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Clone)]
struct CollectArgs {
    /// Language filter of the repository search.
    #[arg(long)]
    language: Option<String>,
    /// Number of repositories to collect (at most 1000).
    #[arg(short = 'n', long)]
    count: Option<usize>,
    /// Environment variable holding the GitHub token.
    #[arg(long)]
    token_env: Option<String>,
}

#[derive(Args, Clone)]
struct QualityArgs {
    /// Directory holding the CK output.
    #[arg(long)]
    root: Option<PathBuf>,
    /// How CK output files are arranged under the root.
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// File suffix (flat) or file name (nested) of the class metrics.
    #[arg(long)]
    unit_file: Option<String>,
}

#[derive(Args, Clone)]
struct ReconcileArgs {
    /// Fail when more than this share of repositories has no quality data.
    #[arg(long)]
    max_unmatched_ratio: Option<f64>,
}

#[derive(Args, Clone)]
struct ReportArgs {
    /// Drop repositories at or above this quantile before reporting.
    #[arg(long)]
    outlier_quantile: Option<f64>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum LayoutArg {
    Flat,
    Nested,
}

impl CollectArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(language) = &self.language {
            config.fetch.language = language.clone();
        }
        if let Some(count) = self.count {
            config.fetch.target_count = count;
        }
        if let Some(token_env) = &self.token_env {
            config.fetch.token_env = token_env.clone();
        }
    }
}

impl QualityArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(root) = &self.root {
            config.quality.root = root.clone();
        }
        let current = match &config.quality.layout {
            DiscoveryLayout::Flat { suffix } => suffix.clone(),
            DiscoveryLayout::Nested { file_name } => file_name.clone(),
        };
        let unit_file = self.unit_file.clone().unwrap_or(current);
        let nested = match self.layout {
            Some(LayoutArg::Nested) => true,
            Some(LayoutArg::Flat) => false,
            None => matches!(config.quality.layout, DiscoveryLayout::Nested { .. }),
        };
        config.quality.layout = if nested {
            DiscoveryLayout::Nested {
                file_name: unit_file,
            }
        } else {
            DiscoveryLayout::Flat { suffix: unit_file }
        };
    }
}

impl ReconcileArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if self.max_unmatched_ratio.is_some() {
            config.reconcile.max_unmatched_ratio = self.max_unmatched_ratio;
        }
    }
}

impl ReportArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if self.outlier_quantile.is_some() {
            config.report.outlier_quantile = self.outlier_quantile;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }

    match &cli.command {
        Commands::Collect(args) => args.apply(&mut config),
        Commands::Consolidate(args) => args.apply(&mut config),
        Commands::Reconcile(args) => args.apply(&mut config),
        Commands::Report(args) => args.apply(&mut config),
        Commands::Run {
            collect,
            quality,
            reconcile,
            report,
        } => {
            collect.apply(&mut config);
            quality.apply(&mut config);
            reconcile.apply(&mut config);
            report.apply(&mut config);
        }
    }
    config.validate()?;

    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Collect(_) => {
            let collection = pipeline.collect().await?;
            println!(
                "{}: {} repositories ({} of {} candidates skipped)",
                collection.path.display(),
                collection.rows.len(),
                collection.skipped.len(),
                collection.candidates
            );
        }
        Commands::Consolidate(_) => {
            let outcome = pipeline.consolidate()?;
            let output = &pipeline.config().output;
            println!(
                "{}: {} classes",
                output.consolidated_units_path().display(),
                outcome.units.len()
            );
            println!(
                "{}: {} repositories",
                output.quality_summary_path().display(),
                outcome.summaries.len()
            );
        }
        Commands::Reconcile(_) => {
            let outcome = pipeline.reconcile()?;
            println!(
                "{}: {} repositories ({} rows dropped by the join)",
                pipeline.config().output.final_dataset_path().display(),
                outcome.rows.len(),
                outcome.dropped_rows()
            );
        }
        Commands::Report(_) => {
            let (report, files) = pipeline.report()?;
            for file in files {
                println!("{}", file.display());
            }
            println!("{} repositories analyzed", report.analyzed_rows);
        }
        Commands::Run { .. } => {
            let summary = pipeline.run().await?;
            info!(
                "Pipeline finished: {} process rows, {} quality summaries, {} joined, {} dropped",
                summary.process_rows,
                summary.quality_summaries,
                summary.final_rows,
                summary.dropped_rows
            );
            for file in summary.report_files {
                println!("{}", file.display());
            }
            println!("{} repositories in the final dataset", summary.final_rows);
        }
    }

    Ok(())
}
