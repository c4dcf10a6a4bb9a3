//! Analysis metrics and their presentation labels
//!
//! Internal names stay stable; the label table is consulted only when a
//! report table is written.

use crate::dataset::FinalDatasetRow;

/// Metrics the research questions are asked about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisMetric {
    Popularity,
    Maturity,
    Activity,
    Size,
    Cbo,
    Dit,
    Lcom,
}

impl AnalysisMetric {
    pub const ALL: [AnalysisMetric; 7] = [
        Self::Popularity,
        Self::Maturity,
        Self::Activity,
        Self::Size,
        Self::Cbo,
        Self::Dit,
        Self::Lcom,
    ];

    pub const QUALITY: [AnalysisMetric; 3] = [Self::Cbo, Self::Dit, Self::Lcom];

    /// Field name in the final dataset
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Popularity => "popularity_stars",
            Self::Maturity => "maturity_years",
            Self::Activity => "activity_releases",
            Self::Size => "total_loc",
            Self::Cbo => "cbo_median",
            Self::Dit => "dit_median",
            Self::Lcom => "lcom_median",
        }
    }

    #[must_use]
    pub fn value(self, row: &FinalDatasetRow) -> f64 {
        match self {
            Self::Popularity => row.popularity_stars as f64,
            Self::Maturity => row.maturity_years,
            Self::Activity => row.activity_releases as f64,
            Self::Size => row.total_loc,
            Self::Cbo => row.cbo_median,
            Self::Dit => row.dit_median,
            Self::Lcom => row.lcom_median,
        }
    }

    #[must_use]
    pub fn values(self, rows: &[FinalDatasetRow]) -> Vec<f64> {
        rows.iter().map(|row| self.value(row)).collect()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        label(self.key())
    }
}

/// Internal name to presentation header
pub const PRESENTATION_LABELS: &[(&str, &str)] = &[
    ("popularity_stars", "Popularity (Stars)"),
    ("maturity_years", "Maturity (Years)"),
    ("activity_releases", "Activity (Releases)"),
    ("total_loc", "Size (Total LOC)"),
    ("cbo_median", "CBO (Median)"),
    ("dit_median", "DIT (Median)"),
    ("lcom_median", "LCOM (Median)"),
    ("metric", "Metric"),
    ("mean", "Mean"),
    ("median", "Median"),
    ("std", "Std. Dev."),
    ("min", "Min"),
    ("max", "Max"),
    ("question", "Research Question"),
    ("process_metric", "Process Metric"),
    ("quality_metric", "Quality Metric"),
    ("rho", "Spearman rho"),
    ("p_value", "p-value"),
    ("n", "N"),
    ("dimension", "Dimension"),
    ("group", "Group"),
    ("count", "Repositories"),
];

/// Presentation header for `key`, or `key` itself when unmapped.
#[must_use]
pub fn label(key: &str) -> &str {
    PRESENTATION_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(key, |(_, v)| v)
}
