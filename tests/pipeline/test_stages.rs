//! Tests for the offline stages chained through their files.

use pretty_assertions::assert_eq;
use std::fs;

use repo_quality_study::{
    FinalDatasetRow, Pipeline, PipelineConfig, PipelineError, ProcessMetricRow, read_rows,
    write_rows,
};

fn process(name_with_owner: &str, stars: u64, releases: u64, years: f64) -> ProcessMetricRow {
    ProcessMetricRow {
        name_with_owner: name_with_owner.to_string(),
        popularity_stars: stars,
        activity_releases: releases,
        maturity_years: years,
    }
}

fn setup(dir: &std::path::Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.quality.root = dir.join("ck");
    config.output.dir = dir.join("out");

    fs::create_dir_all(&config.quality.root).expect("ck dir");
    for (repository, scale) in [("guava", 1), ("netty", 2), ("okhttp", 3), ("retrofit", 4)] {
        let mut lines = vec!["file,class,type,cbo,dit,lcom,loc".to_string()];
        for unit in 1..=3 {
            let value = scale * unit;
            lines.push(format!(
                "U{unit}.java,com.U{unit},class,{value},{scale},{},{}",
                value * 2,
                value * 10
            ));
        }
        fs::write(
            config.quality.root.join(format!("{repository}class.csv")),
            lines.join("\n"),
        )
        .expect("ck file");
    }

    write_rows(
        &config.output.process_metrics_path(),
        &[
            process("google/guava", 48000, 40, 11.2),
            process("netty/netty", 32000, 200, 12.9),
            process("square/okhttp", 45000, 90, 11.8),
            process("square/retrofit", 42000, 30, 12.1),
            process("someone/never-analyzed", 10000, 5, 3.0),
        ],
    )
    .expect("process metrics");

    config
}

#[test]
fn test_consolidate_reconcile_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = Pipeline::new(setup(dir.path()));

    let consolidation = pipeline.consolidate().expect("consolidate");
    assert_eq!(consolidation.summaries.len(), 4);
    assert!(pipeline.config().output.consolidated_units_path().is_file());

    let reconciliation = pipeline.reconcile().expect("reconcile");
    assert_eq!(reconciliation.rows.len(), 4);
    assert_eq!(
        reconciliation.unmatched_process,
        vec!["someone/never-analyzed"]
    );

    let written: Vec<FinalDatasetRow> =
        read_rows(&pipeline.config().output.final_dataset_path()).expect("final dataset");
    assert_eq!(written, reconciliation.rows);

    let (report, files) = pipeline.report().expect("report");
    assert_eq!(report.analyzed_rows, 4);
    assert_eq!(files.len(), 4);
    assert!(files.iter().all(|f| f.starts_with(pipeline.config().output.report_dir_path())));
}

#[test]
fn test_join_threshold_fails_reconcile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = setup(dir.path());
    config.reconcile.max_unmatched_ratio = Some(0.1);
    let pipeline = Pipeline::new(config);

    pipeline.consolidate().expect("consolidate");
    let result = pipeline.reconcile();

    assert!(matches!(
        result,
        Err(PipelineError::JoinMismatch {
            unmatched: 1,
            total: 5,
            ..
        })
    ));
    assert!(!pipeline.config().output.final_dataset_path().exists());
}

#[test]
fn test_reconcile_requires_earlier_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = PipelineConfig::default();
    config.output.dir = dir.path().join("empty");

    let result = Pipeline::new(config).reconcile();
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[tokio::test]
async fn test_run_checks_quality_root_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = PipelineConfig::default();
    config.quality.root = dir.path().join("no-ck-output");
    config.output.dir = dir.path().join("out");

    let result = Pipeline::new(config).run().await;

    assert!(matches!(result, Err(PipelineError::Config(_))));
    assert!(!dir.path().join("out").exists());
}
