//! Final analysis dataset
//!
//! Reconciles process metrics with quality summaries and persists every
//! pipeline table as delimited text.

pub mod io;
pub mod reconcile;

pub use io::{TableRow, read_rows, write_rows};
pub use reconcile::{FinalDatasetRow, Reconciliation, reconcile};
