//! Spearman rank correlation

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::dataset::FinalDatasetRow;
use crate::metrics::stats;
use crate::report::labels::AnalysisMetric;

/// Rank correlation of two samples
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correlation {
    pub rho: f64,
    /// Two-sided, from the Student-t approximation; `None` below three pairs
    pub p_value: Option<f64>,
    pub n: usize,
}

/// Spearman's rho with average ranks for ties.
///
/// `None` when the samples differ in length, hold fewer than two pairs, or
/// either side is constant.
#[must_use]
pub fn spearman(x: &[f64], y: &[f64]) -> Option<Correlation> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let rho = pearson(&stats::average_ranks(x), &stats::average_ranks(y))?;
    Some(Correlation {
        rho,
        p_value: two_sided_p_value(rho, n),
        n,
    })
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let mean_x = stats::mean(x)?;
    let mean_y = stats::mean(y)?;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((cov / denominator).clamp(-1.0, 1.0))
}

fn two_sided_p_value(rho: f64, n: usize) -> Option<f64> {
    if n < 3 {
        return None;
    }
    if rho.abs() >= 1.0 {
        return Some(0.0);
    }
    let dof = (n - 2) as f64;
    let t = rho * (dof / ((1.0 - rho) * (1.0 + rho))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Pairwise rho across `metrics`; the diagonal is 1 unless a metric is constant.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    pub metrics: Vec<AnalysisMetric>,
    pub rho: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    #[must_use]
    pub fn compute(rows: &[FinalDatasetRow], metrics: &[AnalysisMetric]) -> Self {
        let columns: Vec<Vec<f64>> = metrics.iter().map(|m| m.values(rows)).collect();
        let rho = columns
            .iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| spearman(a, b).map(|c| c.rho))
                    .collect()
            })
            .collect();
        Self {
            metrics: metrics.to_vec(),
            rho,
        }
    }

    #[must_use]
    pub fn get(&self, a: AnalysisMetric, b: AnalysisMetric) -> Option<f64> {
        let i = self.metrics.iter().position(|m| *m == a)?;
        let j = self.metrics.iter().position(|m| *m == b)?;
        self.rho[i][j]
    }
}

/// The four process dimensions set against code quality
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResearchQuestion {
    Popularity,
    Maturity,
    Activity,
    Size,
}

impl ResearchQuestion {
    pub const ALL: [ResearchQuestion; 4] =
        [Self::Popularity, Self::Maturity, Self::Activity, Self::Size];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Popularity => "RQ01",
            Self::Maturity => "RQ02",
            Self::Activity => "RQ03",
            Self::Size => "RQ04",
        }
    }

    #[must_use]
    pub fn process_metric(self) -> AnalysisMetric {
        match self {
            Self::Popularity => AnalysisMetric::Popularity,
            Self::Maturity => AnalysisMetric::Maturity,
            Self::Activity => AnalysisMetric::Activity,
            Self::Size => AnalysisMetric::Size,
        }
    }
}

/// One cell of the research-question table
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionResult {
    pub question: ResearchQuestion,
    pub quality_metric: AnalysisMetric,
    pub correlation: Option<Correlation>,
}

/// Correlates each process dimension with each quality median.
#[must_use]
pub fn answer_research_questions(rows: &[FinalDatasetRow]) -> Vec<QuestionResult> {
    ResearchQuestion::ALL
        .iter()
        .flat_map(|&question| {
            let process = question.process_metric().values(rows);
            AnalysisMetric::QUALITY.iter().map(move |&quality_metric| {
                let quality = quality_metric.values(rows);
                QuestionResult {
                    question,
                    quality_metric,
                    correlation: spearman(&process, &quality),
                }
            })
        })
        .collect()
}
