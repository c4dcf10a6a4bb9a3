//! Repository records and the GraphQL wire shapes they are decoded from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A search hit, only good for driving the detail lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateRef {
    pub owner: String,
    pub name: String,
}

impl CandidateRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    #[must_use]
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Repository detail as returned by the detail query.
///
/// Counters and the creation date stay optional; the process-metric
/// derivation decides what a missing value means.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDetail {
    pub name_with_owner: String,
    pub created_at: Option<DateTime<Utc>>,
    pub release_count: Option<u64>,
    pub star_count: Option<u64>,
}

/// Outcome of the detail stage
#[derive(Clone, Debug, Default)]
pub struct DetailFetch {
    pub details: Vec<EntityDetail>,
    /// `owner/name` of every candidate whose lookup failed
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorItem {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchConnection {
    #[serde(default)]
    pub nodes: Vec<Option<SearchNode>>,
    pub page_info: PageInfo,
}

/// `... on Repository` yields `{}` for any other node type
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchNode {
    pub owner: Option<OwnerNode>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerNode {
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryNode {
    pub name_with_owner: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub releases: Option<TotalCount>,
    pub stargazer_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalCount {
    pub total_count: Option<u64>,
}

impl SearchNode {
    pub(crate) fn into_candidate(self) -> Option<CandidateRef> {
        match (self.owner, self.name) {
            (Some(owner), Some(name)) => Some(CandidateRef::new(owner.login, name)),
            _ => None,
        }
    }
}

impl RepositoryNode {
    pub(crate) fn into_detail(self, candidate: &CandidateRef) -> EntityDetail {
        EntityDetail {
            name_with_owner: self
                .name_with_owner
                .unwrap_or_else(|| candidate.name_with_owner()),
            created_at: self.created_at,
            release_count: self.releases.and_then(|r| r.total_count),
            star_count: self.stargazer_count,
        }
    }
}
