//! GitHub GraphQL client wrapper
//!
//! Posts query documents to a single GraphQL endpoint with bearer
//! authentication and decodes the `data` member of the response.
//!
//! # Examples
//!
//! ```rust,no_run
//! use repo_quality_study::GraphQlClient;
//! use serde_json::{Value, json};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gh = GraphQlClient::builder()
//!         .personal_token("ghp_...")
//!         .build()?;
//!
//!     let viewer: Value = gh
//!         .execute("query { viewer { login } }", &json!({}))
//!         .await?;
//!     println!("{}: {}", gh.endpoint(), viewer["viewer"]["login"]);
//!     Ok(())
//! }
//! ```

use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::github::error::{FetchError, FetchResult};
use crate::github::types::GraphQlEnvelope;

const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";
const DEFAULT_TOKEN_ENV: &str = "TOKEN";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GraphQL client bound to one endpoint and token.
///
/// Callers await each request before issuing the next; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    variables: &'a Value,
}

impl GraphQlClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GraphQlClientBuilder {
        GraphQlClientBuilder::new()
    }

    /// Builds a client for the configured endpoint and timeout.
    pub fn from_config(config: &FetchConfig, token: impl Into<String>) -> FetchResult<Self> {
        Self::builder()
            .endpoint(config.api_url.clone())
            .timeout(config.request_timeout())
            .token_env(config.token_env.clone())
            .personal_token(token)
            .build()
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one query and decodes `data` into `T`.
    ///
    /// Anything but HTTP 200 is returned as [`FetchError::Http`] with the raw
    /// body; a non-empty `errors` array becomes [`FetchError::GraphQl`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
    ) -> FetchResult<T> {
        debug!("POST {} variables={variables}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&QueryBody { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlEnvelope<T> = serde_json::from_str(&body)?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(FetchError::GraphQl(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| FetchError::GraphQl("response carried no data".to_string()))
    }
}

/// Builder for [`GraphQlClient`]
#[derive(Default)]
pub struct GraphQlClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    token_env: Option<String>,
    timeout: Option<Duration>,
}

impl GraphQlClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the GraphQL endpoint (defaults to api.github.com)
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set personal access token
    #[must_use]
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Environment variable the token was read from, named when it is missing
    #[must_use]
    pub fn token_env(mut self, env_var: impl Into<String>) -> Self {
        self.token_env = Some(env_var.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client. A missing or blank token fails before any request.
    pub fn build(self) -> FetchResult<GraphQlClient> {
        let Some(token) = self.token.filter(|t| !t.trim().is_empty()) else {
            return Err(FetchError::MissingToken {
                env_var: self
                    .token_env
                    .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string()),
            });
        };

        let mut http = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| FetchError::ClientSetup(e.to_string()))?;

        Ok(GraphQlClient {
            http,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            token,
        })
    }
}
