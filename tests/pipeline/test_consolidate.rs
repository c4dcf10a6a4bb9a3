//! Tests for CK metric discovery and per-repository summaries.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

use repo_quality_study::{DiscoveryLayout, PipelineError, QualityMetric, consolidate};

const HEADER: &str = "file,class,type,cbo,wmc,dit,lcom,loc";

fn write(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, lines.join("\n") + "\n").expect("write file");
}

fn flat() -> DiscoveryLayout {
    DiscoveryLayout::default()
}

fn nested() -> DiscoveryLayout {
    DiscoveryLayout::Nested {
        file_name: "class.csv".to_string(),
    }
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn test_flat_layout_summary() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("guavaclass.csv"),
        &[
            HEADER,
            "A.java,com.A,class,1,3,1,0,10",
            "B.java,com.B,class,2,4,1,5,20",
            "C.java,com.C,class,6,1,1,10,30",
        ],
    );
    write(&root.path().join("notes.txt"), &["not a metric file"]);

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");

    assert_eq!(outcome.files_discovered, 1);
    assert_eq!(outcome.units.len(), 3);
    assert_eq!(outcome.summaries.len(), 1);

    let summary = &outcome.summaries[0];
    assert_eq!(summary.repository, "guava");
    assert_eq!(summary.unit_count, 3);
    assert!(close(summary.total_loc, 60.0));
    assert!(close(summary.cbo_mean, 3.0));
    assert!(close(summary.cbo_median, 2.0));
    assert!(close(summary.cbo_std.expect("cbo std"), 7f64.sqrt()));
    assert!(close(summary.dit_std.expect("dit std"), 0.0));
    assert!(close(summary.lcom_median, 5.0));
    assert!(close(summary.loc_mean, 20.0));
}

#[test]
fn test_empty_file_is_skipped() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("oneclass.csv"),
        &[HEADER, "A.java,com.A,class,4,1,2,3,100"],
    );
    write(&root.path().join("twoclass.csv"), &[HEADER]);
    fs::write(root.path().join("threeclass.csv"), "").expect("write file");

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");

    assert_eq!(outcome.files_discovered, 3);
    assert_eq!(outcome.skipped_files.len(), 2);
    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].repository, "one");
}

#[test]
fn test_single_unit_has_no_std() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("tinyclass.csv"),
        &[HEADER, "A.java,com.A,class,4,1,2,3,100"],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");
    let summary = &outcome.summaries[0];

    assert_eq!(summary.unit_count, 1);
    for metric in QualityMetric::ALL {
        assert_eq!(summary.metric(metric).std, None);
    }
    assert!(close(summary.cbo_mean, 4.0));
    assert!(close(summary.cbo_median, 4.0));
}

#[test]
fn test_means_lie_within_observed_range() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("spreadclass.csv"),
        &[
            HEADER,
            "A.java,com.A,class,0,1,0,0,5",
            "B.java,com.B,class,17,1,3,40,500",
            "C.java,com.C,class,3,1,1,2,42",
            "D.java,com.D,class,9,1,2,8,77",
        ],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");
    let summary = &outcome.summaries[0];

    for (metric, low, high) in [
        (QualityMetric::Cbo, 0.0, 17.0),
        (QualityMetric::Dit, 0.0, 3.0),
        (QualityMetric::Lcom, 0.0, 40.0),
        (QualityMetric::Loc, 5.0, 500.0),
    ] {
        let stats = summary.metric(metric);
        assert!(stats.mean >= low && stats.mean <= high, "{metric:?} mean");
        assert!(stats.median >= low && stats.median <= high, "{metric:?} median");
    }
}

#[test]
fn test_non_numeric_cells_are_ignored() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("mixedclass.csv"),
        &[
            HEADER,
            "A.java,com.A,class,2,1,1,NaN,10",
            "B.java,com.B,class,n/a,1,1,4,20",
            "C.java,com.C,class,4,1,1,6,",
        ],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");
    let summary = &outcome.summaries[0];

    assert_eq!(summary.unit_count, 3);
    assert!(close(summary.cbo_mean, 3.0));
    assert!(close(summary.lcom_mean, 5.0));
    assert!(close(summary.total_loc, 30.0));
}

#[test]
fn test_nested_layout_uses_parent_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("java/proj-a/class.csv"),
        &[HEADER, "A.java,com.A,class,1,1,1,1,10"],
    );
    write(
        &root.path().join("proj-b/class.csv"),
        &[HEADER, "B.java,com.B,class,2,1,1,1,20"],
    );
    write(
        &root.path().join(".cache/proj-c/class.csv"),
        &[HEADER, "C.java,com.C,class,3,1,1,1,30"],
    );
    write(
        &root.path().join("proj-b/method.csv"),
        &["file,method,loc", "B.java,run,3"],
    );

    let outcome = consolidate(root.path(), &nested()).expect("consolidation");
    let repositories: Vec<&str> = outcome
        .summaries
        .iter()
        .map(|s| s.repository.as_str())
        .collect();

    assert_eq!(repositories, vec!["proj-a", "proj-b"]);
    assert_eq!(outcome.units.len(), 2);
}

#[test]
fn test_missing_columns_keep_units_but_skip_summary() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("partialclass.csv"),
        &["file,class,cbo,dit,loc", "A.java,com.A,1,1,10"],
    );
    write(
        &root.path().join("fullclass.csv"),
        &[HEADER, "A.java,com.A,class,1,1,1,1,10"],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");

    assert_eq!(outcome.incomplete_files.len(), 1);
    assert_eq!(outcome.units.len(), 2);
    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].repository, "full");
}

#[test]
fn test_unit_table_unions_columns() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("aclass.csv"),
        &["file,cbo,dit,lcom,loc", "A.java,1,1,1,10"],
    );
    write(
        &root.path().join("bclass.csv"),
        &["file,cbo,dit,lcom,loc,rfc", "B.java,2,2,2,20,7"],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");
    let units = &outcome.units;

    assert_eq!(units.columns(), ["file", "cbo", "dit", "lcom", "loc", "rfc"]);
    let first = &units.rows()[0];
    let second = &units.rows()[1];
    assert_eq!(first.repository, "a");
    assert_eq!(units.numeric(first, "rfc"), None);
    assert_eq!(units.numeric(second, "rfc"), Some(7.0));

    let out = root.path().join("consolidated.csv");
    units.write_csv(&out).expect("write units");
    let written = fs::read_to_string(&out).expect("read units");
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("file,cbo,dit,lcom,loc,rfc,repository"));
    assert_eq!(lines.next(), Some("A.java,1,1,1,10,,a"));
    assert_eq!(lines.next(), Some("B.java,2,2,2,20,7,b"));
}

#[test]
fn test_missing_root_is_config_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let result = consolidate(&root.path().join("absent"), &flat());
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn test_no_metric_files_is_config_error() {
    let root = tempfile::tempdir().expect("tempdir");
    write(&root.path().join("readme.md"), &["nothing here"]);

    let result = consolidate(root.path(), &flat());
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn test_rerun_gives_identical_summaries() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("guavaclass.csv"),
        &[HEADER, "A.java,com.A,class,1,3,1,0,10", "B.java,com.B,class,5,4,2,7,33"],
    );
    write(
        &root.path().join("nettyclass.csv"),
        &[HEADER, "C.java,com.C,class,2,1,1,1,12"],
    );

    let first = consolidate(root.path(), &flat()).expect("first run");
    let second = consolidate(root.path(), &flat()).expect("second run");

    assert_eq!(first.summaries, second.summaries);
}

#[test]
fn test_short_row_keeps_file() {
    let root = tempfile::tempdir().expect("tempdir");
    write(
        &root.path().join("guavaclass.csv"),
        &[
            "file,class,cbo,dit,lcom,loc,extra",
            "A.java,com.A,1,1,2,10,x",
            "B.java,com.B,3,2,4,20,y",
            "C.java,com.C,5,1,6,30",
        ],
    );

    let outcome = consolidate(root.path(), &flat()).expect("consolidation");

    assert!(outcome.skipped_files.is_empty());
    assert_eq!(outcome.units.len(), 3);
    let third = &outcome.units.rows()[2];
    assert_eq!(outcome.units.numeric(third, "loc"), Some(30.0));
    assert_eq!(third.cell(outcome.units.column_index("extra").expect("extra")), None);

    let summary = &outcome.summaries[0];
    assert_eq!(summary.repository, "guava");
    assert_eq!(summary.unit_count, 3);
    assert!(close(summary.cbo_mean, 3.0));
    assert!(close(summary.total_loc, 60.0));
}
