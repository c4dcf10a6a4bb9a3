//! Descriptive statistics and group summaries of the final dataset

use crate::dataset::FinalDatasetRow;
use crate::metrics::stats;
use crate::report::labels::AnalysisMetric;

#[derive(Clone, Debug, PartialEq)]
pub struct DescriptiveStats {
    pub metric: AnalysisMetric,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[must_use]
pub fn describe(rows: &[FinalDatasetRow], metrics: &[AnalysisMetric]) -> Vec<DescriptiveStats> {
    metrics
        .iter()
        .map(|&metric| {
            let values = metric.values(rows);
            DescriptiveStats {
                metric,
                mean: stats::mean(&values),
                median: stats::median(&values),
                std: stats::sample_std(&values),
                min: stats::min(&values),
                max: stats::max(&values),
            }
        })
        .collect()
}

/// Process dimensions split into terciles for the group summary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupDimension {
    Maturity,
    Activity,
    Size,
}

impl GroupDimension {
    pub const ALL: [GroupDimension; 3] = [Self::Maturity, Self::Activity, Self::Size];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Maturity => "Maturity (RQ02)",
            Self::Activity => "Activity (RQ03)",
            Self::Size => "Size (RQ04)",
        }
    }

    /// Lower, middle and upper tercile names
    #[must_use]
    pub fn group_labels(self) -> [&'static str; 3] {
        match self {
            Self::Maturity => ["Young", "Intermediate", "Mature"],
            Self::Activity => ["Low", "Moderate", "High"],
            Self::Size => ["Small", "Medium", "Large"],
        }
    }

    #[must_use]
    pub fn metric(self) -> AnalysisMetric {
        match self {
            Self::Maturity => AnalysisMetric::Maturity,
            Self::Activity => AnalysisMetric::Activity,
            Self::Size => AnalysisMetric::Size,
        }
    }
}

/// Mean quality medians of one group of repositories.
///
/// Process-metric means are only filled in on the overall row.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub dimension: &'static str,
    pub group: &'static str,
    pub count: usize,
    pub cbo: Option<f64>,
    pub dit: Option<f64>,
    pub lcom: Option<f64>,
    pub popularity: Option<f64>,
    pub maturity: Option<f64>,
    pub activity: Option<f64>,
    pub size: Option<f64>,
}

fn mean_of(metric: AnalysisMetric, rows: &[&FinalDatasetRow]) -> Option<f64> {
    let values: Vec<f64> = rows.iter().map(|row| metric.value(row)).collect();
    stats::mean(&values)
}

impl GroupSummary {
    fn of(dimension: &'static str, group: &'static str, rows: &[&FinalDatasetRow]) -> Self {
        Self {
            dimension,
            group,
            count: rows.len(),
            cbo: mean_of(AnalysisMetric::Cbo, rows),
            dit: mean_of(AnalysisMetric::Dit, rows),
            lcom: mean_of(AnalysisMetric::Lcom, rows),
            popularity: None,
            maturity: None,
            activity: None,
            size: None,
        }
    }

    fn overall(rows: &[&FinalDatasetRow]) -> Self {
        Self {
            popularity: mean_of(AnalysisMetric::Popularity, rows),
            maturity: mean_of(AnalysisMetric::Maturity, rows),
            activity: mean_of(AnalysisMetric::Activity, rows),
            size: mean_of(AnalysisMetric::Size, rows),
            ..Self::of("Overall", "All", rows)
        }
    }
}

/// Overall row followed by three tercile rows per dimension.
///
/// Cut points are the 0.33 and 0.66 quantiles; a value equal to a cut point
/// falls in the lower group.
#[must_use]
pub fn group_summaries(rows: &[FinalDatasetRow]) -> Vec<GroupSummary> {
    let all: Vec<&FinalDatasetRow> = rows.iter().collect();
    let mut summaries = vec![GroupSummary::overall(&all)];

    for dimension in GroupDimension::ALL {
        let metric = dimension.metric();
        let values = metric.values(rows);
        let (Some(low_cut), Some(high_cut)) =
            (stats::quantile(&values, 0.33), stats::quantile(&values, 0.66))
        else {
            continue;
        };

        let mut groups: [Vec<&FinalDatasetRow>; 3] = Default::default();
        for row in rows {
            let value = metric.value(row);
            let slot = if value <= low_cut {
                0
            } else if value <= high_cut {
                1
            } else {
                2
            };
            groups[slot].push(row);
        }

        for (label, members) in dimension.group_labels().into_iter().zip(&groups) {
            summaries.push(GroupSummary::of(dimension.name(), label, members));
        }
    }

    summaries
}

/// Keeps rows strictly below the `quantile` threshold of popularity,
/// activity, LCOM median and total size.
#[must_use]
pub fn trim_outliers(rows: &[FinalDatasetRow], quantile: f64) -> Vec<FinalDatasetRow> {
    const TRIMMED: [AnalysisMetric; 4] = [
        AnalysisMetric::Popularity,
        AnalysisMetric::Activity,
        AnalysisMetric::Lcom,
        AnalysisMetric::Size,
    ];

    let thresholds: Vec<(AnalysisMetric, f64)> = TRIMMED
        .iter()
        .filter_map(|&metric| {
            stats::quantile(&metric.values(rows), quantile).map(|limit| (metric, limit))
        })
        .collect();

    rows.iter()
        .filter(|row| {
            thresholds
                .iter()
                .all(|&(metric, limit)| metric.value(row) < limit)
        })
        .cloned()
        .collect()
}
