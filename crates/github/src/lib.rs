//! GitHub listing and content collaborator.
//!
//! Talks to the GitHub REST API for repository metadata and the recursive
//! git tree, and to `raw.githubusercontent.com` for file contents. Only
//! public repositories are supported; an optional bearer token raises the
//! API rate limits.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use repolens_context::{ContentFetcher, EntryKind, FetchError, TreeEntry};
use repolens_protocol::{RepoRef, RepoSlug};

mod error;

pub use error::{GitHubError, Result};

const GITHUB_API: &str = "https://api.github.com";
const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub REST API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_urls(token, GITHUB_API, RAW_CONTENT_BASE)
    }

    /// Construct against alternate base URLs (used by tests).
    pub fn with_base_urls(token: Option<&str>, api_base: &str, raw_base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GitHubError::UnexpectedStatus {
                    status: 0,
                    message: "GITHUB_TOKEN contains invalid header characters".to_string(),
                })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the repository's default branch.
    pub async fn default_branch(&self, slug: &RepoSlug) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, slug.owner, slug.name);
        let response = self.client.get(&url).send().await?;
        let response = self.check_repo_status(response, slug).await?;

        let info: RepoInfo = response.json().await?;
        Ok(info.default_branch)
    }

    /// List the full recursive file tree at the resolved ref.
    pub async fn list_tree(&self, repo: &RepoRef) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.name, repo.git_ref
        );
        let response = self.client.get(&url).send().await?;
        let slug = RepoSlug {
            owner: repo.owner.clone(),
            name: repo.name.clone(),
        };
        let response = self.check_repo_status(response, &slug).await?;

        let listing: TreeResponse = response.json().await?;
        if listing.truncated {
            // The listing API caps very large trees; the rendered tree is
            // then incomplete. Accepted limitation for pathological repos.
            log::warn!("tree listing for {repo} was truncated by the remote API");
        }
        Ok(tree_entries(listing))
    }

    /// Fetch raw file content at the resolved ref. Failures here are
    /// file-level: the caller skips the file and continues.
    pub async fn fetch_raw(&self, repo: &RepoRef, path: &str) -> std::result::Result<String, FetchError> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, repo.owner, repo.name, repo.git_ref, path
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if rate_limit_exhausted(status, response.headers()) {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "unexpected status {status} for {path}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| FetchError::Decode(format!("{path} is not valid UTF-8")))
    }

    async fn check_repo_status(&self, response: Response, slug: &RepoSlug) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::RepoNotFound(slug.to_string()));
        }
        if rate_limit_exhausted(status, response.headers()) {
            return Err(GitHubError::RateLimited);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(GitHubError::RepoForbidden(slug.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

/// GitHub reports both "forbidden" and "rate limited" as 403; the remaining
/// quota header tells them apart. Secondary limits use 429.
fn rate_limit_exhausted(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false)
}

/// A [`ContentFetcher`] bound to one resolved repository.
pub struct RepoContentFetcher {
    client: GitHubClient,
    repo: RepoRef,
}

impl RepoContentFetcher {
    pub fn new(client: GitHubClient, repo: RepoRef) -> Self {
        Self { client, repo }
    }
}

#[async_trait]
impl ContentFetcher for RepoContentFetcher {
    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        self.client.fetch_raw(&self.repo, path).await
    }
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
}

fn tree_entries(listing: TreeResponse) -> Vec<TreeEntry> {
    listing
        .tree
        .into_iter()
        .filter_map(|item| {
            let kind = match item.kind.as_str() {
                "blob" => EntryKind::File,
                "tree" => EntryKind::Directory,
                // Submodule commits and anything unknown carry no content.
                _ => return None,
            };
            Some(TreeEntry {
                path: item.path,
                kind,
                size: item.size,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tree_entries_map_blobs_and_trees() {
        let listing: TreeResponse = serde_json::from_str(
            r#"{
                "tree": [
                    {"path": "README.md", "type": "blob", "size": 120},
                    {"path": "src", "type": "tree"},
                    {"path": "src/main.py", "type": "blob", "size": 64},
                    {"path": "deps/lib", "type": "commit"}
                ],
                "truncated": false
            }"#,
        )
        .expect("valid listing");

        let entries = tree_entries(listing);
        assert_eq!(
            entries,
            vec![
                TreeEntry::file("README.md", 120),
                TreeEntry::directory("src"),
                TreeEntry::file("src/main.py", 64),
            ]
        );
    }

    #[test]
    fn tree_entries_tolerate_missing_fields() {
        let listing: TreeResponse =
            serde_json::from_str(r#"{"tree": [{"path": "a", "type": "blob"}]}"#)
                .expect("valid listing");
        let entries = tree_entries(listing);
        assert_eq!(entries, vec![TreeEntry::file("a", 0)]);
    }

    #[test]
    fn rate_limit_detection_reads_quota_header() {
        let mut exhausted = HeaderMap::new();
        exhausted.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        assert!(rate_limit_exhausted(StatusCode::FORBIDDEN, &exhausted));
        assert!(rate_limit_exhausted(
            StatusCode::TOO_MANY_REQUESTS,
            &HeaderMap::new()
        ));

        let mut remaining = HeaderMap::new();
        remaining.insert("x-ratelimit-remaining", HeaderValue::from_static("41"));
        assert!(!rate_limit_exhausted(StatusCode::FORBIDDEN, &remaining));
        assert!(!rate_limit_exhausted(StatusCode::FORBIDDEN, &HeaderMap::new()));
        assert!(!rate_limit_exhausted(StatusCode::OK, &exhausted));
    }
}
