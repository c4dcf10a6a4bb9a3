//! Process metrics derived from repository details

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dataset::TableRow;
use crate::github::EntityDetail;

const DAYS_PER_YEAR: f64 = 365.25;

/// One row of the process-metric table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetricRow {
    pub name_with_owner: String,
    /// Star count
    pub popularity_stars: u64,
    /// Release count
    pub activity_releases: u64,
    /// Age in years, two decimals
    pub maturity_years: f64,
}

impl TableRow for ProcessMetricRow {
    const COLUMNS: &'static [&'static str] = &[
        "name_with_owner",
        "popularity_stars",
        "activity_releases",
        "maturity_years",
    ];
}

impl ProcessMetricRow {
    /// Second `/` segment of the qualified name, used as the join key.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.name_with_owner.split('/').nth(1)
    }
}

/// Derives one row per detail that has a creation date.
///
/// `reference_now` is captured once by the caller so every row ages
/// against the same instant. Missing counters become 0.
#[must_use]
pub fn derive_process_metrics(
    details: &[EntityDetail],
    reference_now: DateTime<Utc>,
) -> Vec<ProcessMetricRow> {
    details
        .iter()
        .filter_map(|detail| {
            let Some(created_at) = detail.created_at else {
                debug!("Dropping {}: no creation date", detail.name_with_owner);
                return None;
            };
            Some(ProcessMetricRow {
                name_with_owner: detail.name_with_owner.clone(),
                popularity_stars: detail.star_count.unwrap_or(0),
                activity_releases: detail.release_count.unwrap_or(0),
                maturity_years: maturity_years(created_at, reference_now),
            })
        })
        .collect()
}

/// Whole elapsed days over 365.25, rounded to two decimals. Never negative.
#[must_use]
pub fn maturity_years(created_at: DateTime<Utc>, reference_now: DateTime<Utc>) -> f64 {
    let days = (reference_now - created_at).num_days().max(0);
    round_to(days as f64 / DAYS_PER_YEAR, 2)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
