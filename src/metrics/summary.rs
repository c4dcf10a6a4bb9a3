//! Per-repository reduction of class-level quality metrics

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dataset::TableRow;
use crate::metrics::stats;

/// Columns every summarized unit file must carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QualityMetric {
    /// Coupling between objects
    Cbo,
    /// Depth of inheritance tree
    Dit,
    /// Lack of cohesion of methods
    Lcom,
    /// Lines of code
    Loc,
}

impl QualityMetric {
    pub const ALL: [QualityMetric; 4] = [Self::Cbo, Self::Dit, Self::Lcom, Self::Loc];

    /// Column name in the unit files
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Cbo => "cbo",
            Self::Dit => "dit",
            Self::Lcom => "lcom",
            Self::Loc => "loc",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Cbo => 0,
            Self::Dit => 1,
            Self::Lcom => 2,
            Self::Loc => 3,
        }
    }
}

/// Numeric samples gathered for one repository, one vector per metric
#[derive(Debug, Clone, Default)]
pub struct MetricSamples {
    values: [Vec<f64>; 4],
    units: usize,
}

impl MetricSamples {
    pub fn push(&mut self, metric: QualityMetric, value: f64) {
        self.values[metric.slot()].push(value);
    }

    /// Counts one analyzed unit, whatever its cells held.
    pub fn record_unit(&mut self) {
        self.units += 1;
    }

    #[must_use]
    pub fn values(&self, metric: QualityMetric) -> &[f64] {
        &self.values[metric.slot()]
    }

    #[must_use]
    pub fn units(&self) -> usize {
        self.units
    }
}

/// Mean, median and sample standard deviation of one metric
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSummary {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
}

impl MetricSummary {
    fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: stats::mean(values)?,
            median: stats::median(values)?,
            std: stats::sample_std(values),
        })
    }
}

/// One row of the per-repository quality summary.
///
/// `*_std` is empty for repositories with a single analyzed unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualitySummaryRow {
    pub repository: String,
    pub unit_count: usize,
    pub total_loc: f64,
    pub cbo_mean: f64,
    pub cbo_median: f64,
    pub cbo_std: Option<f64>,
    pub dit_mean: f64,
    pub dit_median: f64,
    pub dit_std: Option<f64>,
    pub lcom_mean: f64,
    pub lcom_median: f64,
    pub lcom_std: Option<f64>,
    pub loc_mean: f64,
    pub loc_median: f64,
    pub loc_std: Option<f64>,
}

impl TableRow for QualitySummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "repository",
        "unit_count",
        "total_loc",
        "cbo_mean",
        "cbo_median",
        "cbo_std",
        "dit_mean",
        "dit_median",
        "dit_std",
        "lcom_mean",
        "lcom_median",
        "lcom_std",
        "loc_mean",
        "loc_median",
        "loc_std",
    ];
}

impl QualitySummaryRow {
    /// Reduces the samples of one repository.
    ///
    /// Returns `None` (and warns) when any required metric has no numeric value.
    #[must_use]
    pub fn summarize(repository: &str, samples: &MetricSamples) -> Option<Self> {
        let reduce = |metric: QualityMetric| {
            let summary = MetricSummary::of(samples.values(metric));
            if summary.is_none() {
                warn!(
                    "{repository}: no numeric '{}' values, left out of the summary",
                    metric.column()
                );
            }
            summary
        };
        let cbo = reduce(QualityMetric::Cbo)?;
        let dit = reduce(QualityMetric::Dit)?;
        let lcom = reduce(QualityMetric::Lcom)?;
        let loc = reduce(QualityMetric::Loc)?;

        Some(Self {
            repository: repository.to_string(),
            unit_count: samples.units(),
            total_loc: samples.values(QualityMetric::Loc).iter().sum(),
            cbo_mean: cbo.mean,
            cbo_median: cbo.median,
            cbo_std: cbo.std,
            dit_mean: dit.mean,
            dit_median: dit.median,
            dit_std: dit.std,
            lcom_mean: lcom.mean,
            lcom_median: lcom.median,
            lcom_std: lcom.std,
            loc_mean: loc.mean,
            loc_median: loc.median,
            loc_std: loc.std,
        })
    }

    #[must_use]
    pub fn metric(&self, metric: QualityMetric) -> MetricSummary {
        match metric {
            QualityMetric::Cbo => MetricSummary {
                mean: self.cbo_mean,
                median: self.cbo_median,
                std: self.cbo_std,
            },
            QualityMetric::Dit => MetricSummary {
                mean: self.dit_mean,
                median: self.dit_median,
                std: self.dit_std,
            },
            QualityMetric::Lcom => MetricSummary {
                mean: self.lcom_mean,
                median: self.lcom_median,
                std: self.lcom_std,
            },
            QualityMetric::Loc => MetricSummary {
                mean: self.loc_mean,
                median: self.loc_median,
                std: self.loc_std,
            },
        }
    }
}
