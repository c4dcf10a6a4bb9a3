//! GitHub GraphQL collection
//!
//! Searches the most starred repositories of a language and looks up the
//! process-metric inputs of each one.

pub mod client;
pub mod error;
pub mod fetch;
mod queries;
mod throttle;
pub mod types;

// Re-export client types
pub use client::{GraphQlClient, GraphQlClientBuilder};

// Re-export error types
pub use error::{FetchError, FetchResult};

pub use fetch::{fetch_candidates, fetch_detail, fetch_details};
pub use types::{CandidateRef, DetailFetch, EntityDetail};
