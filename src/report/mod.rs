//! Statistical reporting over the final dataset
//!
//! Descriptive statistics, Spearman correlations for the four research
//! questions and tercile group summaries, written as CSV tables with
//! presentation headers.

pub mod correlation;
pub mod descriptive;
pub mod labels;

pub use correlation::{
    Correlation, CorrelationMatrix, QuestionResult, ResearchQuestion, answer_research_questions,
    spearman,
};
pub use descriptive::{
    DescriptiveStats, GroupDimension, GroupSummary, describe, group_summaries, trim_outliers,
};
pub use labels::{AnalysisMetric, PRESENTATION_LABELS, label};

use log::info;
use std::path::{Path, PathBuf};

use crate::config::ReportConfig;
use crate::dataset::FinalDatasetRow;
use crate::error::{PipelineError, PipelineResult};

pub const DESCRIPTIVE_FILE: &str = "descriptive_stats.csv";
pub const CORRELATION_FILE: &str = "correlation_matrix.csv";
pub const QUESTIONS_FILE: &str = "research_questions.csv";
pub const GROUPS_FILE: &str = "group_summary.csv";

/// Every table of the report, computed in memory
#[derive(Clone, Debug)]
pub struct ResearchReport {
    pub analyzed_rows: usize,
    /// Rows removed by outlier trimming
    pub trimmed_rows: usize,
    pub descriptive: Vec<DescriptiveStats>,
    pub matrix: CorrelationMatrix,
    pub questions: Vec<QuestionResult>,
    pub groups: Vec<GroupSummary>,
}

impl ResearchReport {
    #[must_use]
    pub fn build(rows: &[FinalDatasetRow], config: &ReportConfig) -> Self {
        let trimmed: Vec<FinalDatasetRow>;
        let analyzed: &[FinalDatasetRow] = match config.outlier_quantile {
            Some(quantile) => {
                trimmed = trim_outliers(rows, quantile);
                info!(
                    "Outlier trimming at the {quantile} quantile kept {} of {} repositories",
                    trimmed.len(),
                    rows.len()
                );
                &trimmed
            }
            None => rows,
        };

        Self {
            analyzed_rows: analyzed.len(),
            trimmed_rows: rows.len() - analyzed.len(),
            descriptive: describe(analyzed, &AnalysisMetric::ALL),
            matrix: CorrelationMatrix::compute(analyzed, &AnalysisMetric::ALL),
            questions: answer_research_questions(analyzed),
            groups: group_summaries(analyzed),
        }
    }

    /// Logs the research-question table, one line per correlation.
    pub fn log_summary(&self) {
        info!("Analysis based on {} repositories", self.analyzed_rows);
        for result in &self.questions {
            let process = result.question.process_metric().key();
            let quality = result.quality_metric.key();
            match result.correlation {
                Some(c) => info!(
                    "[{}] {process} vs {quality}: rho={:.3}, p={}",
                    result.question.id(),
                    c.rho,
                    format_value(c.p_value, 3)
                ),
                None => info!(
                    "[{}] {process} vs {quality}: undefined",
                    result.question.id()
                ),
            }
        }
    }

    /// Writes the four report tables into `dir`, returning their paths.
    pub fn write(&self, dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

        let paths = vec![
            self.write_descriptive(&dir.join(DESCRIPTIVE_FILE))?,
            self.write_matrix(&dir.join(CORRELATION_FILE))?,
            self.write_questions(&dir.join(QUESTIONS_FILE))?,
            self.write_groups(&dir.join(GROUPS_FILE))?,
        ];
        Ok(paths)
    }

    fn write_descriptive(&self, path: &Path) -> PipelineResult<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["metric", "mean", "median", "std", "min", "max"].map(label))?;
        for row in &self.descriptive {
            writer.write_record([
                row.metric.label().to_string(),
                format_value(row.mean, 2),
                format_value(row.median, 2),
                format_value(row.std, 2),
                format_value(row.min, 2),
                format_value(row.max, 2),
            ])?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(path.to_path_buf())
    }

    fn write_matrix(&self, path: &Path) -> PipelineResult<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = vec![String::new()];
        header.extend(self.matrix.metrics.iter().map(|m| m.label().to_string()));
        writer.write_record(&header)?;

        for (metric, values) in self.matrix.metrics.iter().zip(&self.matrix.rho) {
            let mut record = vec![metric.label().to_string()];
            record.extend(values.iter().map(|v| format_value(*v, 3)));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(path.to_path_buf())
    }

    fn write_questions(&self, path: &Path) -> PipelineResult<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(
            ["question", "process_metric", "quality_metric", "rho", "p_value", "n"].map(label),
        )?;
        for result in &self.questions {
            let correlation = result.correlation;
            writer.write_record([
                result.question.id().to_string(),
                result.question.process_metric().label().to_string(),
                result.quality_metric.label().to_string(),
                format_value(correlation.map(|c| c.rho), 3),
                format_value(correlation.and_then(|c| c.p_value), 3),
                correlation.map_or_else(String::new, |c| c.n.to_string()),
            ])?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(path.to_path_buf())
    }

    fn write_groups(&self, path: &Path) -> PipelineResult<PathBuf> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            label("dimension"),
            label("group"),
            label("count"),
            AnalysisMetric::Cbo.label(),
            AnalysisMetric::Dit.label(),
            AnalysisMetric::Lcom.label(),
            AnalysisMetric::Popularity.label(),
            AnalysisMetric::Maturity.label(),
            AnalysisMetric::Activity.label(),
            AnalysisMetric::Size.label(),
        ])?;
        for group in &self.groups {
            writer.write_record([
                group.dimension.to_string(),
                group.group.to_string(),
                group.count.to_string(),
                format_value(group.cbo, 2),
                format_value(group.dit, 2),
                format_value(group.lcom, 2),
                format_value(group.popularity, 2),
                format_value(group.maturity, 2),
                format_value(group.activity, 2),
                format_value(group.size, 2),
            ])?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(path.to_path_buf())
    }
}

/// Fixed-precision cell, blank for undefined values.
fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => String::new(),
    }
}
