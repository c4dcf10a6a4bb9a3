//! Discovery and consolidation of CK class-level metric files

use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};
use crate::metrics::summary::{MetricSamples, QualityMetric, QualitySummaryRow};

/// Column holding the repository identifier in the consolidated table
pub const ENTITY_COLUMN: &str = "repository";

const DEFAULT_UNIT_FILE: &str = "class.csv";

fn default_unit_file() -> String {
    DEFAULT_UNIT_FILE.to_string()
}

/// How per-repository metric files are arranged under the root
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoveryLayout {
    /// `<root>/<repository><suffix>`, e.g. `<root>/guavaclass.csv`
    Flat {
        #[serde(default = "default_unit_file")]
        suffix: String,
    },
    /// `<root>/**/<repository>/<file_name>`
    Nested {
        #[serde(default = "default_unit_file")]
        file_name: String,
    },
}

impl Default for DiscoveryLayout {
    fn default() -> Self {
        Self::Flat {
            suffix: default_unit_file(),
        }
    }
}

/// A unit file and the repository it belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetricFile {
    pub repository: String,
    pub path: PathBuf,
}

impl DiscoveryLayout {
    /// Lists every metric file under `root`, sorted by repository then path.
    pub fn discover(&self, root: &Path) -> PipelineResult<Vec<MetricFile>> {
        if !root.is_dir() {
            return Err(PipelineError::Config(format!(
                "quality metrics directory not found: {}",
                root.display()
            )));
        }

        let mut files = match self {
            Self::Flat { suffix } => discover_flat(root, suffix)?,
            Self::Nested { file_name } => discover_nested(root, file_name),
        };
        files.sort();
        Ok(files)
    }
}

fn discover_flat(root: &Path, suffix: &str) -> PipelineResult<Vec<MetricFile>> {
    let entries = std::fs::read_dir(root).map_err(|e| PipelineError::io(root, e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(root, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(repository) = file_name.strip_suffix(suffix) else {
            continue;
        };
        if repository.is_empty() {
            warn!("  - '{file_name}' names no repository; skipping");
            continue;
        }
        files.push(MetricFile {
            repository: repository.to_string(),
            path,
        });
    }

    Ok(files)
}

fn discover_nested(root: &Path, file_name: &str) -> Vec<MetricFile> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name().to_str() == Some(file_name))
        .filter_map(|e| {
            let repository = e
                .path()
                .parent()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())?
                .to_string();
            Some(MetricFile {
                repository,
                path: e.into_path(),
            })
        })
        .collect()
}

/// Helper function to check if entry is hidden
fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// One analyzed code unit (a class for CK), tagged with its repository
#[derive(Debug, Clone, PartialEq)]
pub struct QualityUnitRow {
    pub repository: String,
    values: Vec<Option<String>>,
}

impl QualityUnitRow {
    /// Raw cell at a table column index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// Concatenation of every readable unit file.
///
/// Columns are the union of all file headers in first-seen order. A row
/// built before a column appeared reads that column as blank.
#[derive(Debug, Clone, Default)]
pub struct QualityUnitTable {
    columns: Vec<String>,
    rows: Vec<QualityUnitRow>,
}

impl QualityUnitTable {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[QualityUnitRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell parsed as a finite number.
    #[must_use]
    pub fn numeric(&self, row: &QualityUnitRow, column: &str) -> Option<f64> {
        self.column_index(column)
            .and_then(|index| row.cell(index))
            .and_then(parse_number)
    }

    fn append(
        &mut self,
        repository: &str,
        headers: &csv::StringRecord,
        records: &[csv::StringRecord],
    ) {
        let mapping: Vec<(usize, usize)> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| *name != ENTITY_COLUMN)
            .map(|(source, name)| {
                let target = match self.column_index(name) {
                    Some(index) => index,
                    None => {
                        self.columns.push(name.to_string());
                        self.columns.len() - 1
                    }
                };
                (source, target)
            })
            .collect();

        for record in records {
            let mut values = vec![None; self.columns.len()];
            for &(source, target) in &mapping {
                values[target] = record.get(source).map(str::to_string);
            }
            self.rows.push(QualityUnitRow {
                repository: repository.to_string(),
                values,
            });
        }
    }

    /// Writes the table with the repository column last, overwriting `path`.
    pub fn write_csv(&self, path: &Path) -> PipelineResult<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        header.push(ENTITY_COLUMN);
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record: Vec<&str> = (0..self.columns.len())
                .map(|index| row.cell(index).unwrap_or(""))
                .collect();
            record.push(&row.repository);
            writer.write_record(&record)?;
        }

        writer.flush().map_err(|e| PipelineError::io(path, e))
    }
}

/// Both outputs of the consolidation stage plus what was left out
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    pub units: QualityUnitTable,
    /// One row per repository, sorted by repository
    pub summaries: Vec<QualitySummaryRow>,
    pub files_discovered: usize,
    /// Empty or unreadable files
    pub skipped_files: Vec<PathBuf>,
    /// Files kept in `units` but missing a required column
    pub incomplete_files: Vec<PathBuf>,
}

/// Discovers, reads and tags every unit file, then summarizes per repository.
///
/// Empty or unreadable files are skipped with a warning. A missing root or
/// an empty discovery is a configuration error.
pub fn consolidate(root: &Path, layout: &DiscoveryLayout) -> PipelineResult<Consolidation> {
    info!("Searching for quality metric files in '{}'", root.display());

    let files = layout.discover(root)?;
    if files.is_empty() {
        return Err(PipelineError::Config(format!(
            "no quality metric files matching {layout:?} under {}",
            root.display()
        )));
    }
    info!("Found {} metric files to process", files.len());

    let mut outcome = Consolidation {
        files_discovered: files.len(),
        ..Consolidation::default()
    };
    let mut samples: BTreeMap<String, MetricSamples> = BTreeMap::new();

    for file in &files {
        let (headers, records) = match read_unit_file(&file.path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("  - Could not read '{}': {e}", file.path.display());
                outcome.skipped_files.push(file.path.clone());
                continue;
            }
        };

        if records.is_empty() {
            warn!("  - '{}' is empty; skipping", file.path.display());
            outcome.skipped_files.push(file.path.clone());
            continue;
        }

        let required: Option<Vec<(QualityMetric, usize)>> = QualityMetric::ALL
            .iter()
            .map(|&metric| {
                headers
                    .iter()
                    .position(|h| h == metric.column())
                    .map(|index| (metric, index))
            })
            .collect();

        match required {
            Some(columns) => {
                let entry = samples.entry(file.repository.clone()).or_default();
                for record in &records {
                    entry.record_unit();
                    for &(metric, index) in &columns {
                        if let Some(value) = record.get(index).and_then(parse_number) {
                            entry.push(metric, value);
                        }
                    }
                }
            }
            None => {
                warn!(
                    "  - '{}' lacks one of cbo, dit, lcom, loc; kept out of the summary",
                    file.path.display()
                );
                outcome.incomplete_files.push(file.path.clone());
            }
        }

        outcome.units.append(&file.repository, &headers, &records);
        info!("  - Processed {} ({} rows)", file.repository, records.len());
    }

    outcome.summaries = samples
        .iter()
        .filter_map(|(repository, s)| QualitySummaryRow::summarize(repository, s))
        .collect();

    info!(
        "Consolidated {} classes from {} files into {} repository summaries",
        outcome.units.len(),
        outcome.files_discovered - outcome.skipped_files.len(),
        outcome.summaries.len()
    );

    Ok(outcome)
}

fn read_unit_file(
    path: &Path,
) -> Result<(csv::StringRecord, Vec<csv::StringRecord>), csv::Error> {
    // short rows read as blank trailing cells
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok((headers, records))
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
