//! Inner join of process metrics and quality summaries

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::dataset::io::TableRow;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::{ProcessMetricRow, QualitySummaryRow};

/// One fully observed repository of the analysis dataset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalDatasetRow {
    pub name_with_owner: String,
    pub repository: String,
    pub popularity_stars: u64,
    pub activity_releases: u64,
    pub maturity_years: f64,
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

impl TableRow for FinalDatasetRow {
    const COLUMNS: &'static [&'static str] = &[
        "name_with_owner",
        "repository",
        "popularity_stars",
        "activity_releases",
        "maturity_years",
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

impl FinalDatasetRow {
    fn merge(process: &ProcessMetricRow, quality: &QualitySummaryRow) -> Self {
        Self {
            name_with_owner: process.name_with_owner.clone(),
            repository: quality.repository.clone(),
            popularity_stars: process.popularity_stars,
            activity_releases: process.activity_releases,
            maturity_years: process.maturity_years,
            unit_count: quality.unit_count,
            total_loc: quality.total_loc,
            cbo_mean: quality.cbo_mean,
            cbo_median: quality.cbo_median,
            cbo_std: quality.cbo_std,
            dit_mean: quality.dit_mean,
            dit_median: quality.dit_median,
            dit_std: quality.dit_std,
            lcom_mean: quality.lcom_mean,
            lcom_median: quality.lcom_median,
            lcom_std: quality.lcom_std,
            loc_mean: quality.loc_mean,
            loc_median: quality.loc_median,
            loc_std: quality.loc_std,
        }
    }
}

/// Join result together with what fell out of it
#[derive(Clone, Debug, Default)]
pub struct Reconciliation {
    /// Sorted by `name_with_owner`
    pub rows: Vec<FinalDatasetRow>,
    /// Qualified names whose short name matched no quality row
    pub unmatched_process: Vec<String>,
    /// Quality repositories no process row pointed at
    pub unmatched_quality: Vec<String>,
}

impl Reconciliation {
    /// Rows lost on either side of the join.
    #[must_use]
    pub fn dropped_rows(&self) -> usize {
        self.unmatched_process.len() + self.unmatched_quality.len()
    }

    /// Share of process rows that found no quality counterpart.
    #[must_use]
    pub fn unmatched_ratio(&self) -> f64 {
        let total = self.rows.len() + self.unmatched_process.len();
        if total == 0 {
            0.0
        } else {
            self.unmatched_process.len() as f64 / total as f64
        }
    }

    /// Fails with [`PipelineError::JoinMismatch`] above `max_ratio`.
    pub fn ensure_unmatched_at_most(&self, max_ratio: f64) -> PipelineResult<()> {
        if self.unmatched_ratio() > max_ratio {
            return Err(PipelineError::JoinMismatch {
                unmatched: self.unmatched_process.len(),
                total: self.rows.len() + self.unmatched_process.len(),
                max_ratio,
            });
        }
        Ok(())
    }
}

/// Joins on the second `/` segment of the qualified name, compared exactly
/// (case-sensitive) against the quality repository identifier.
///
/// Both inputs are unique on their key by construction; this is not
/// re-checked. Input order does not affect the resulting row set.
#[must_use]
pub fn reconcile(process: &[ProcessMetricRow], quality: &[QualitySummaryRow]) -> Reconciliation {
    let by_repository: HashMap<&str, &QualitySummaryRow> =
        quality.iter().map(|q| (q.repository.as_str(), q)).collect();

    let mut outcome = Reconciliation::default();
    let mut matched: HashSet<&str> = HashSet::new();

    for row in process {
        match row
            .short_name()
            .and_then(|name| by_repository.get_key_value(name))
        {
            Some((&key, summary)) => {
                matched.insert(key);
                outcome.rows.push(FinalDatasetRow::merge(row, summary));
            }
            None => outcome.unmatched_process.push(row.name_with_owner.clone()),
        }
    }

    outcome.unmatched_quality = quality
        .iter()
        .filter(|q| !matched.contains(q.repository.as_str()))
        .map(|q| q.repository.clone())
        .collect();

    outcome
        .rows
        .sort_by(|a, b| a.name_with_owner.cmp(&b.name_with_owner));
    outcome.unmatched_process.sort();
    outcome.unmatched_quality.sort();

    info!(
        "Joined {} repositories with complete process and quality data",
        outcome.rows.len()
    );
    if outcome.dropped_rows() > 0 {
        warn!(
            "Join dropped {} process rows and {} quality rows with no counterpart ({:.1}% of process rows)",
            outcome.unmatched_process.len(),
            outcome.unmatched_quality.len(),
            outcome.unmatched_ratio() * 100.0
        );
    }
    if outcome.rows.is_empty() && !process.is_empty() && !quality.is_empty() {
        warn!("No repository was joined; check that names in both tables correspond");
    }

    outcome
}
