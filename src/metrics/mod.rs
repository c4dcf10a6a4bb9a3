//! Process and quality metrics
//!
//! Derives process metrics from fetched repository details and consolidates
//! the class-level output of the CK static-analysis tool.

pub mod process;
pub mod quality;
pub mod stats;
pub mod summary;

pub use process::{ProcessMetricRow, derive_process_metrics, maturity_years};
pub use quality::{
    Consolidation, DiscoveryLayout, ENTITY_COLUMN, MetricFile, QualityUnitRow, QualityUnitTable,
    consolidate,
};
pub use summary::{MetricSamples, MetricSummary, QualityMetric, QualitySummaryRow};
