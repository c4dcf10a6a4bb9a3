//! Stage orchestration
//!
//! Each stage reads its complete input from disk (or the network), builds its
//! complete output in memory and then overwrites one file. A crash leaves
//! the files of earlier stages intact.

use chrono::Utc;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::dataset::{FinalDatasetRow, Reconciliation, read_rows, reconcile, write_rows};
use crate::error::{PipelineError, PipelineResult};
use crate::github::{GraphQlClient, fetch_candidates, fetch_details};
use crate::metrics::{
    Consolidation, ProcessMetricRow, QualitySummaryRow, consolidate, derive_process_metrics,
};
use crate::report::ResearchReport;

/// Result of the collection stage
#[derive(Debug, Clone)]
pub struct Collection {
    pub candidates: usize,
    pub rows: Vec<ProcessMetricRow>,
    /// Candidates whose detail lookup failed
    pub skipped: Vec<String>,
    pub path: PathBuf,
}

/// Files and counts produced by a full run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub process_rows: usize,
    pub quality_summaries: usize,
    pub final_rows: usize,
    pub dropped_rows: usize,
    pub report_files: Vec<PathBuf>,
}

/// Runs the research pipeline against one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetches repository metadata and writes the process-metric table.
    ///
    /// The token is resolved before any request is made.
    pub async fn collect(&self) -> PipelineResult<Collection> {
        let token = self.config.fetch.token()?;
        let client = GraphQlClient::from_config(&self.config.fetch, token)?;
        self.collect_with(&client).await
    }

    /// Same as [`Pipeline::collect`] with a caller-supplied client.
    pub async fn collect_with(&self, client: &GraphQlClient) -> PipelineResult<Collection> {
        let fetch = &self.config.fetch;

        let candidates = fetch_candidates(client, fetch).await?;
        info!("Obtained a list of {} repositories", candidates.len());

        let details = fetch_details(client, &candidates, fetch).await;
        let reference_now = Utc::now();
        let rows = derive_process_metrics(&details.details, reference_now);

        let path = self.config.output.process_metrics_path();
        write_rows(&path, &rows)?;
        info!(
            "Process metrics for {} repositories saved to {}",
            rows.len(),
            path.display()
        );

        Ok(Collection {
            candidates: candidates.len(),
            rows,
            skipped: details.skipped,
            path,
        })
    }

    /// Consolidates the unit files and writes the unit and summary tables.
    pub fn consolidate(&self) -> PipelineResult<Consolidation> {
        let quality = &self.config.quality;
        let outcome = consolidate(&quality.root, &quality.layout)?;

        self.ensure_output_dir()?;
        let units_path = self.config.output.consolidated_units_path();
        outcome.units.write_csv(&units_path)?;
        info!(
            "{} classes consolidated into {}",
            outcome.units.len(),
            units_path.display()
        );

        let summary_path = self.config.output.quality_summary_path();
        write_rows(&summary_path, &outcome.summaries)?;
        info!(
            "{} repository summaries saved to {}",
            outcome.summaries.len(),
            summary_path.display()
        );

        Ok(outcome)
    }

    /// Joins the two tables written by the earlier stages.
    pub fn reconcile(&self) -> PipelineResult<Reconciliation> {
        let output = &self.config.output;
        let process: Vec<ProcessMetricRow> = read_rows(&output.process_metrics_path())?;
        let quality: Vec<QualitySummaryRow> = read_rows(&output.quality_summary_path())?;

        let outcome = reconcile(&process, &quality);
        if let Some(max_ratio) = self.config.reconcile.max_unmatched_ratio {
            outcome.ensure_unmatched_at_most(max_ratio)?;
        }

        let path = output.final_dataset_path();
        write_rows(&path, &outcome.rows)?;
        info!(
            "Final dataset of {} repositories saved to {}",
            outcome.rows.len(),
            path.display()
        );

        Ok(outcome)
    }

    /// Computes and writes the report tables from the final dataset.
    pub fn report(&self) -> PipelineResult<(ResearchReport, Vec<PathBuf>)> {
        let rows: Vec<FinalDatasetRow> = read_rows(&self.config.output.final_dataset_path())?;
        let report = ResearchReport::build(&rows, &self.config.report);
        report.log_summary();

        let dir = self.config.output.report_dir_path();
        let files = report.write(&dir)?;
        info!("{} report tables written to {}", files.len(), dir.display());

        Ok((report, files))
    }

    /// All four stages in order.
    pub async fn run(&self) -> PipelineResult<RunSummary> {
        // fail before the long network stage rather than after it
        if !self.config.quality.root.is_dir() {
            return Err(PipelineError::Config(format!(
                "quality metrics directory not found: {}",
                self.config.quality.root.display()
            )));
        }

        let collection = self.collect().await?;
        let consolidation = self.consolidate()?;
        let reconciliation = self.reconcile()?;
        let (_, report_files) = self.report()?;

        Ok(RunSummary {
            process_rows: collection.rows.len(),
            quality_summaries: consolidation.summaries.len(),
            final_rows: reconciliation.rows.len(),
            dropped_rows: reconciliation.dropped_rows(),
            report_files,
        })
    }

    fn ensure_output_dir(&self) -> PipelineResult<()> {
        let dir: &Path = &self.config.output.dir;
        std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
    }
}
