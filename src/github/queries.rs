//! GraphQL documents sent to the GitHub API

/// One page of repository search results, ordered by the search expression.
pub(crate) const SEARCH_REPOSITORIES: &str = r"
query SearchRepositories($searchQuery: String!, $pageSize: Int!, $afterCursor: String) {
  search(query: $searchQuery, type: REPOSITORY, first: $pageSize, after: $afterCursor) {
    nodes {
      ... on Repository {
        owner {
          login
        }
        name
      }
    }
    pageInfo {
      endCursor
      hasNextPage
    }
  }
}
";

/// Process-metric inputs for one repository.
pub(crate) const REPOSITORY_DETAILS: &str = r"
query RepositoryDetails($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    nameWithOwner
    createdAt
    releases {
      totalCount
    }
    stargazerCount
  }
}
";
