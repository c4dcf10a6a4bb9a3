//! GitHub GraphQL error types

use thiserror::Error;

/// Error types for GitHub GraphQL requests
#[derive(Debug, Error)]
pub enum FetchError {
    /// No credential was available when the client was built
    #[error("GitHub token not found; set the {env_var} environment variable")]
    MissingToken { env_var: String },

    /// Non-200 response, surfaced verbatim
    #[error("Query failed with status {status}:\n{body}")]
    Http { status: u16, body: String },

    /// The response carried a GraphQL `errors` array
    #[error("GitHub API error: {0}")]
    GraphQl(String),

    /// Body was not the JSON shape we asked for
    #[error("Failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The detail query returned `repository: null`
    #[error("Repository not found: {name_with_owner}")]
    NotFound { name_with_owner: String },

    /// Client setup/configuration error
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

/// Convenience result alias for GitHub operations
pub type FetchResult<T> = Result<T, FetchError>;
