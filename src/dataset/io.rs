//! Delimited-text persistence of the pipeline tables

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// A row type persisted as one line of a delimited table.
pub trait TableRow: Serialize {
    /// Header, in field declaration order
    const COLUMNS: &'static [&'static str];
}

/// Writes `rows` with a header row, replacing any existing file.
///
/// An empty table still gets its header line.
pub fn write_rows<T: TableRow>(path: &Path, rows: &[T]) -> PipelineResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(T::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))
}

/// Reads a table written by [`write_rows`] (or by hand).
///
/// A missing file is a configuration error. Malformed lines are logged and
/// skipped, the rest of the file is kept.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> PipelineResult<Vec<T>> {
    if !path.is_file() {
        return Err(PipelineError::Config(format!(
            "required input file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{}: skipping malformed line: {e}", path.display()),
        }
    }
    Ok(rows)
}
