//! Repository fetching logic

use log::{debug, info, warn};
use serde_json::json;
use std::collections::HashSet;

use crate::config::FetchConfig;
use crate::github::client::GraphQlClient;
use crate::github::error::{FetchError, FetchResult};
use crate::github::queries::{REPOSITORY_DETAILS, SEARCH_REPOSITORIES};
use crate::github::throttle::Throttle;
use crate::github::types::{CandidateRef, DetailFetch, EntityDetail, RepositoryData, SearchData};

const DETAIL_PROGRESS_EVERY: usize = 50;

/// Pages through the repository search until `target` candidates are
/// collected or the provider reports no further pages.
///
/// Any page failure aborts the whole search. Never returns more than
/// [`FetchConfig::effective_target`] candidates.
pub async fn fetch_candidates(
    client: &GraphQlClient,
    config: &FetchConfig,
) -> FetchResult<Vec<CandidateRef>> {
    let target = config.effective_target();
    let page_size = config.effective_page_size();
    let search_query = config.search_expression();
    let throttle = Throttle::new(config.page_delay());

    let mut candidates: Vec<CandidateRef> = Vec::with_capacity(target);
    let mut seen: HashSet<String> = HashSet::new();
    let mut after_cursor: Option<String> = None;

    info!("Collecting {target} repositories for '{search_query}' ({page_size} per page)");

    while candidates.len() < target {
        let variables = json!({
            "searchQuery": search_query,
            "pageSize": page_size,
            "afterCursor": after_cursor,
        });
        let page: SearchData = client.execute(SEARCH_REPOSITORIES, &variables).await?;
        let connection = page.search;

        for candidate in connection
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| node.into_candidate())
        {
            if seen.insert(candidate.name_with_owner()) {
                candidates.push(candidate);
            }
        }

        let collected = candidates.len().min(target);
        info!(
            "Collected {collected} of {target} repositories ({:.1}%)",
            percent(collected, target)
        );

        if !connection.page_info.has_next_page {
            info!("No more pages to fetch");
            break;
        }
        match connection.page_info.end_cursor {
            Some(cursor) => after_cursor = Some(cursor),
            None => {
                warn!("Provider reported another page without a cursor; stopping");
                break;
            }
        }

        if candidates.len() < target {
            throttle.pause().await;
        }
    }

    candidates.truncate(target);
    Ok(candidates)
}

/// Fetches one detail record.
pub async fn fetch_detail(
    client: &GraphQlClient,
    candidate: &CandidateRef,
) -> FetchResult<EntityDetail> {
    let variables = json!({ "owner": candidate.owner, "name": candidate.name });
    let data: RepositoryData = client.execute(REPOSITORY_DETAILS, &variables).await?;

    data.repository
        .map(|node| node.into_detail(candidate))
        .ok_or_else(|| FetchError::NotFound {
            name_with_owner: candidate.name_with_owner(),
        })
}

/// Fetches details for every candidate in order.
///
/// A failed lookup is logged and the candidate skipped; there is no retry.
pub async fn fetch_details(
    client: &GraphQlClient,
    candidates: &[CandidateRef],
    config: &FetchConfig,
) -> DetailFetch {
    let throttle = Throttle::new(config.detail_delay());
    let total = candidates.len();
    let mut outcome = DetailFetch {
        details: Vec::with_capacity(total),
        skipped: Vec::new(),
    };

    info!("Fetching details for {total} repositories");

    for (index, candidate) in candidates.iter().enumerate() {
        match fetch_detail(client, candidate).await {
            Ok(detail) => {
                debug!("Fetched {}", detail.name_with_owner);
                outcome.details.push(detail);
            }
            Err(e) => {
                warn!(
                    "Could not fetch details for {}: {e}",
                    candidate.name_with_owner()
                );
                outcome.skipped.push(candidate.name_with_owner());
            }
        }

        let done = index + 1;
        if done % DETAIL_PROGRESS_EVERY == 0 || done == total {
            info!("Loaded details {done}/{total} ({:.1}%)", percent(done, total));
        }

        if done < total {
            throttle.pause().await;
        }
    }

    outcome
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
