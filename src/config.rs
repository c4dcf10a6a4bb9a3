//! Configuration for the collection, consolidation and reporting stages

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};
use crate::github::FetchError;
use crate::metrics::DiscoveryLayout;

/// The search API never returns more than this many results for one query.
pub const MAX_SEARCH_RESULTS: usize = 1000;

/// Largest page the GraphQL `search` connection accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Top-level configuration passed into every stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub quality: QualityConfig,
    pub output: OutputConfig,
    pub reconcile: ReconcileConfig,
    pub report: ReportConfig,
}

/// Remote metadata collection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub api_url: String,
    /// Name of the environment variable holding the bearer token
    pub token_env: String,
    pub language: String,
    pub target_count: usize,
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com/graphql".to_string(),
            token_env: "TOKEN".to_string(),
            language: "Java".to_string(),
            target_count: MAX_SEARCH_RESULTS,
            page_size: MAX_PAGE_SIZE,
            page_delay_ms: 200,
            detail_delay_ms: 100,
            request_timeout_secs: 60,
        }
    }
}

impl FetchConfig {
    /// Requested count clamped to the search ceiling.
    #[must_use]
    pub fn effective_target(&self) -> usize {
        self.target_count.min(MAX_SEARCH_RESULTS)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    #[must_use]
    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Search expression for the most starred public repositories of `language`.
    #[must_use]
    pub fn search_expression(&self) -> String {
        format!("language:{} sort:stars-desc is:public", self.language)
    }

    /// Reads the bearer token from the configured environment variable.
    ///
    /// Blank values count as missing.
    pub fn token(&self) -> PipelineResult<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(PipelineError::Config(
                FetchError::MissingToken {
                    env_var: self.token_env.clone(),
                }
                .to_string(),
            )),
        }
    }
}

/// Where the external static-analysis output lives and how it is laid out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub root: PathBuf,
    pub layout: DiscoveryLayout,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("ck_results"),
            layout: DiscoveryLayout::default(),
        }
    }
}

/// Output directory and file names. Every stage overwrites its file whole.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub process_metrics: String,
    pub consolidated_units: String,
    pub quality_summary: String,
    pub final_dataset: String,
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            process_metrics: "repo_metrics.csv".to_string(),
            consolidated_units: "consolidated_metrics.csv".to_string(),
            quality_summary: "repository_summary_metrics.csv".to_string(),
            final_dataset: "final_analysis_dataset.csv".to_string(),
            report_dir: "report_tables".to_string(),
        }
    }
}

impl OutputConfig {
    #[must_use]
    pub fn process_metrics_path(&self) -> PathBuf {
        self.dir.join(&self.process_metrics)
    }

    #[must_use]
    pub fn consolidated_units_path(&self) -> PathBuf {
        self.dir.join(&self.consolidated_units)
    }

    #[must_use]
    pub fn quality_summary_path(&self) -> PathBuf {
        self.dir.join(&self.quality_summary)
    }

    #[must_use]
    pub fn final_dataset_path(&self) -> PathBuf {
        self.dir.join(&self.final_dataset)
    }

    #[must_use]
    pub fn report_dir_path(&self) -> PathBuf {
        self.dir.join(&self.report_dir)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Fail when more than this share of process rows finds no quality row.
    /// `None` only logs the count.
    pub max_unmatched_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Drop repositories at or above this quantile before reporting, e.g. `0.99`.
    pub outlier_quantile: Option<f64>,
}

impl PipelineConfig {
    /// Loads a TOML file; absent sections and fields keep their defaults.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| PipelineError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no stage can work with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.fetch.api_url.trim().is_empty() {
            return Err(PipelineError::Config("fetch.api_url is empty".to_string()));
        }
        if let Some(ratio) = self.reconcile.max_unmatched_ratio
            && !(0.0..=1.0).contains(&ratio)
        {
            return Err(PipelineError::Config(format!(
                "reconcile.max_unmatched_ratio must lie in [0, 1], got {ratio}"
            )));
        }
        if let Some(q) = self.report.outlier_quantile
            && !(q > 0.0 && q <= 1.0)
        {
            return Err(PipelineError::Config(format!(
                "report.outlier_quantile must lie in (0, 1], got {q}"
            )));
        }
        Ok(())
    }
}
