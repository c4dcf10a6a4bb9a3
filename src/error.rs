//! Pipeline error types

use std::path::PathBuf;
use thiserror::Error;

use crate::github::FetchError;

/// Errors surfaced at every stage boundary of the pipeline.
///
/// Per-item problems (one repository detail, one unreadable metric file) are
/// logged and skipped inside the stages and never reach this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing credential, missing input, invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal collection failure (page fetch or client setup)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A required input exists but could not be interpreted
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Too many process rows found no quality counterpart
    #[error(
        "{unmatched} of {total} repositories had no quality metrics (allowed ratio {max_ratio})"
    )]
    JoinMismatch {
        unmatched: usize,
        total: usize,
        max_ratio: f64,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
