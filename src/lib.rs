//! `repo_quality_study` - process metrics versus code quality of popular repositories
//!
//! Collects stars, age and release counts of the most popular repositories of
//! a language through the GitHub GraphQL API, consolidates class-level CK
//! metrics produced outside this crate, joins the two by repository name and
//! reports rank correlations for four research questions.

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod github;
pub mod metrics;
pub mod pipeline;
pub mod report;

// Re-export configuration
pub use config::{
    FetchConfig, MAX_PAGE_SIZE, MAX_SEARCH_RESULTS, OutputConfig, PipelineConfig, QualityConfig,
    ReconcileConfig, ReportConfig,
};

// Re-export error types
pub use error::{PipelineError, PipelineResult};
pub use github::{FetchError, FetchResult};

// Re-export GitHub client types
pub use github::{
    CandidateRef, DetailFetch, EntityDetail, GraphQlClient, GraphQlClientBuilder,
    fetch_candidates, fetch_detail, fetch_details,
};

// Re-export pipeline tables
pub use dataset::{FinalDatasetRow, Reconciliation, TableRow, read_rows, reconcile, write_rows};
pub use metrics::{
    Consolidation, DiscoveryLayout, ProcessMetricRow, QualityMetric, QualitySummaryRow,
    QualityUnitRow, QualityUnitTable, consolidate, derive_process_metrics,
};

pub use pipeline::{Collection, Pipeline, RunSummary};
pub use report::ResearchReport;
