//! Tests for descriptive statistics, rank correlations and report tables.

use pretty_assertions::assert_eq;
use std::fs;

use repo_quality_study::metrics::stats;
use repo_quality_study::report::{
    AnalysisMetric, CorrelationMatrix, GroupDimension, ResearchQuestion,
    answer_research_questions, describe, group_summaries, label, spearman, trim_outliers,
};
use repo_quality_study::{FinalDatasetRow, ReportConfig, ResearchReport};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

/// Row whose every metric grows with `i`
fn row(i: u32) -> FinalDatasetRow {
    let x = f64::from(i);
    FinalDatasetRow {
        name_with_owner: format!("owner{i}/repo{i}"),
        repository: format!("repo{i}"),
        popularity_stars: u64::from(i) * 100,
        activity_releases: u64::from(i),
        maturity_years: x / 2.0,
        unit_count: 10,
        total_loc: x * 1000.0,
        cbo_mean: x,
        cbo_median: x,
        cbo_std: Some(1.0),
        dit_mean: 1.0 + x / 10.0,
        dit_median: 1.0 + x / 10.0,
        dit_std: Some(0.5),
        lcom_mean: x * 3.0,
        lcom_median: x * 3.0,
        lcom_std: Some(2.0),
        loc_mean: 100.0,
        loc_median: 100.0,
        loc_std: Some(5.0),
    }
}

#[test]
fn test_spearman_monotone() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let up = [10.0, 20.0, 25.0, 80.0, 81.0];
    let down = [9.0, 7.0, 5.0, 3.0, 1.0];

    let c = spearman(&x, &up).expect("defined");
    assert!(close(c.rho, 1.0));
    assert_eq!(c.p_value, Some(0.0));
    assert_eq!(c.n, 5);

    let c = spearman(&x, &down).expect("defined");
    assert!(close(c.rho, -1.0));
}

#[test]
fn test_spearman_with_ties() {
    let c = spearman(&[1.0, 2.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]).expect("defined");
    assert!(close(c.rho, 4.5 / 22.5f64.sqrt()));
    let p = c.p_value.expect("p-value");
    assert!(p > 0.0 && p < 1.0);
}

#[test]
fn test_spearman_undefined_cases() {
    assert!(spearman(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_none());
    assert!(spearman(&[1.0], &[2.0]).is_none());
    assert!(spearman(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_none());

    let pair = spearman(&[1.0, 2.0], &[3.0, 4.0]).expect("defined");
    assert_eq!(pair.p_value, None);
}

#[test]
fn test_quantile_interpolates() {
    assert_eq!(stats::quantile(&[4.0, 1.0, 3.0, 2.0], 0.5), Some(2.5));
    let ten: Vec<f64> = (1..=10).map(f64::from).collect();
    assert!(close(stats::quantile(&ten, 0.33).expect("defined"), 3.97));
    assert_eq!(stats::quantile(&[], 0.5), None);
    assert_eq!(stats::quantile(&ten, 1.5), None);
}

#[test]
fn test_describe() {
    let rows: Vec<FinalDatasetRow> = (1..=3).map(row).collect();
    let table = describe(&rows, &[AnalysisMetric::Popularity]);

    assert_eq!(table.len(), 1);
    let popularity = &table[0];
    assert_eq!(popularity.mean, Some(200.0));
    assert_eq!(popularity.median, Some(200.0));
    assert_eq!(popularity.min, Some(100.0));
    assert_eq!(popularity.max, Some(300.0));
    assert!(close(popularity.std.expect("std"), 100.0));
}

#[test]
fn test_research_questions_cover_every_pair() {
    let rows: Vec<FinalDatasetRow> = (1..=12).map(row).collect();
    let results = answer_research_questions(&rows);

    assert_eq!(results.len(), 12);
    assert_eq!(results[0].question, ResearchQuestion::Popularity);
    assert_eq!(results[0].quality_metric, AnalysisMetric::Cbo);
    assert_eq!(results[11].question, ResearchQuestion::Size);
    assert_eq!(results[11].quality_metric, AnalysisMetric::Lcom);
    for result in &results {
        let c = result.correlation.expect("defined");
        assert!(close(c.rho, 1.0));
        assert_eq!(c.n, 12);
    }
}

#[test]
fn test_matrix_diagonal() {
    let rows: Vec<FinalDatasetRow> = (1..=6).map(row).collect();
    let matrix = CorrelationMatrix::compute(&rows, &AnalysisMetric::ALL);

    for metric in AnalysisMetric::ALL {
        assert!(close(matrix.get(metric, metric).expect("defined"), 1.0));
    }
}

#[test]
fn test_group_summaries() {
    let rows: Vec<FinalDatasetRow> = (1..=9).map(row).collect();
    let groups = group_summaries(&rows);

    assert_eq!(groups.len(), 1 + 3 * GroupDimension::ALL.len());
    let overall = &groups[0];
    assert_eq!(overall.dimension, "Overall");
    assert_eq!(overall.count, 9);
    assert_eq!(overall.popularity, Some(500.0));
    assert_eq!(overall.maturity, Some(2.5));
    assert_eq!(overall.activity, Some(5.0));
    assert_eq!(overall.size, Some(5000.0));

    for dimension in GroupDimension::ALL {
        let members: Vec<_> = groups
            .iter()
            .filter(|g| g.dimension == dimension.name())
            .collect();
        let labels: Vec<&str> = members.iter().map(|g| g.group).collect();
        assert_eq!(labels, dimension.group_labels().to_vec());
        assert_eq!(members.iter().map(|g| g.count).sum::<usize>(), 9);
    }

    // maturity 0.5..=4.5 splits at 1.82 and 3.14
    let young = &groups[1];
    assert_eq!(young.group, "Young");
    assert_eq!(young.count, 3);
    assert_eq!(young.cbo, Some(2.0));
    assert_eq!(young.popularity, None);
    assert_eq!(young.size, None);
}

#[test]
fn test_trim_outliers_is_strict() {
    let rows: Vec<FinalDatasetRow> = (1..=100).map(row).collect();
    let kept = trim_outliers(&rows, 0.99);

    assert_eq!(kept.len(), 99);
    assert!(kept.iter().all(|r| r.repository != "repo100"));

    let all = trim_outliers(&rows, 1.0);
    assert_eq!(all.len(), 99);
}

#[test]
fn test_labels() {
    assert_eq!(label("popularity_stars"), "Popularity (Stars)");
    assert_eq!(AnalysisMetric::Lcom.label(), "LCOM (Median)");
    assert_eq!(label("unmapped_column"), "unmapped_column");
}

#[test]
fn test_report_tables_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rows: Vec<FinalDatasetRow> = (1..=10).map(row).collect();
    let config = ReportConfig {
        outlier_quantile: Some(0.99),
    };

    let report = ResearchReport::build(&rows, &config);
    assert_eq!(report.analyzed_rows, 9);
    assert_eq!(report.trimmed_rows, 1);

    let files = report.write(&dir.path().join("tables")).expect("write");
    assert_eq!(files.len(), 4);
    for file in &files {
        assert!(file.is_file(), "{} missing", file.display());
    }

    let questions = fs::read_to_string(&files[2]).expect("questions");
    let mut lines = questions.lines();
    assert_eq!(
        lines.next(),
        Some("Research Question,Process Metric,Quality Metric,Spearman rho,p-value,N")
    );
    assert_eq!(
        lines.next(),
        Some("RQ01,Popularity (Stars),CBO (Median),1.000,0.000,9")
    );
    assert_eq!(questions.lines().count(), 13);

    let groups = fs::read_to_string(&files[3]).expect("groups");
    let mut lines = groups.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Dimension,Group,Repositories,CBO (Median),DIT (Median),LCOM (Median),\
             Popularity (Stars),Maturity (Years),Activity (Releases),Size (Total LOC)"
        )
    );
    assert!(lines.next().is_some_and(|l| l.starts_with("Overall,All,9,")));
    assert!(lines.next().is_some_and(|l| l.ends_with(",,,,")));

    let descriptive = fs::read_to_string(&files[0]).expect("descriptive");
    assert!(descriptive.starts_with("Metric,Mean,Median,Std. Dev.,Min,Max"));
}
