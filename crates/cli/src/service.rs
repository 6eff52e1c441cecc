use std::sync::Arc;
use thiserror::Error;

use repolens_context::{assemble, AssembledContext, ContextLimits, EntryKind};
use repolens_github::{GitHubClient, GitHubError, RepoContentFetcher};
use repolens_protocol::{RepoSlug, RepoUrlError, Summary};
use repolens_summarizer::{SummarizerError, SummaryModel};

/// Terminal failure of one summarization request. File-level fetch failures
/// are not represented here: assembly recovers from those locally.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidInput(#[from] RepoUrlError),

    #[error("repository appears to be empty")]
    EmptyRepository,

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Summarizer(#[from] SummarizerError),
}

impl ServiceError {
    /// HTTP status and stable error code for the response envelope.
    pub fn status_and_code(&self) -> (u16, &'static str) {
        match self {
            ServiceError::InvalidInput(_) => (422, "invalid_input"),
            ServiceError::EmptyRepository => (400, "empty_repository"),
            ServiceError::GitHub(GitHubError::RepoNotFound(_)) => (404, "repo_not_found"),
            ServiceError::GitHub(GitHubError::RepoForbidden(_)) => (403, "repo_forbidden"),
            ServiceError::GitHub(GitHubError::RateLimited) => (429, "rate_limited"),
            ServiceError::GitHub(_) => (502, "github_unavailable"),
            ServiceError::Summarizer(SummarizerError::QuotaExceeded) => (429, "rate_limited"),
            ServiceError::Summarizer(_) => (502, "summarizer_failed"),
        }
    }

    /// Retry-later style guidance for the caller, where one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ServiceError::InvalidInput(_) => {
                Some("Expected format: https://github.com/owner/repo")
            }
            ServiceError::GitHub(GitHubError::RateLimited) => Some(
                "The GitHub API rate limit is exhausted. Set GITHUB_TOKEN to raise it, or retry later.",
            ),
            ServiceError::Summarizer(SummarizerError::QuotaExceeded) => {
                Some("The summarizer quota is exhausted; retry later.")
            }
            _ => None,
        }
    }
}

/// Orchestrates one stateless summarization request: list, select, fetch,
/// assemble, summarize. Requests share nothing with each other.
pub struct SummarizeService {
    github: GitHubClient,
    model: Arc<dyn SummaryModel>,
    limits: ContextLimits,
}

impl SummarizeService {
    pub fn new(github: GitHubClient, model: Arc<dyn SummaryModel>, limits: ContextLimits) -> Self {
        Self {
            github,
            model,
            limits,
        }
    }

    pub async fn summarize_url(&self, raw_url: &str) -> Result<Summary, ServiceError> {
        let slug = RepoSlug::parse_url(raw_url)?;
        log::info!("summarizing repository {slug}");

        let branch = self.github.default_branch(&slug).await?;
        let repo = slug.at_ref(branch);
        log::debug!("resolved default branch: {}", repo.git_ref);

        let entries = self.github.list_tree(&repo).await?;
        if !entries.iter().any(|e| e.kind == EntryKind::File) {
            return Err(ServiceError::EmptyRepository);
        }
        log::info!("listed {} tree entries for {repo}", entries.len());

        let fetcher = Arc::new(RepoContentFetcher::new(self.github.clone(), repo.clone()));
        let context = assemble(&entries, fetcher, &self.limits).await;
        log_fetch_failures(&context);

        let summary = self.model.summarize(&repo, &context.render_payload()).await?;
        log::info!("summary generated for {repo}");
        Ok(summary)
    }
}

fn log_fetch_failures(context: &AssembledContext) {
    let failed = context
        .skipped
        .iter()
        .filter(|s| matches!(s.reason, repolens_context::SkipReason::FetchFailed { .. }))
        .count();
    if failed > 0 {
        log::warn!("{failed} file(s) failed to fetch; summary continues without them");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_mapping_covers_the_taxonomy() {
        let invalid = ServiceError::InvalidInput(RepoUrlError::Malformed("x".to_string()));
        assert_eq!(invalid.status_and_code(), (422, "invalid_input"));

        assert_eq!(
            ServiceError::EmptyRepository.status_and_code(),
            (400, "empty_repository")
        );
        assert_eq!(
            ServiceError::GitHub(GitHubError::RepoNotFound("a/b".to_string())).status_and_code(),
            (404, "repo_not_found")
        );
        assert_eq!(
            ServiceError::GitHub(GitHubError::RepoForbidden("a/b".to_string())).status_and_code(),
            (403, "repo_forbidden")
        );
        assert_eq!(
            ServiceError::GitHub(GitHubError::RateLimited).status_and_code(),
            (429, "rate_limited")
        );
        assert_eq!(
            ServiceError::Summarizer(SummarizerError::Timeout).status_and_code(),
            (502, "summarizer_failed")
        );
        assert_eq!(
            ServiceError::Summarizer(SummarizerError::QuotaExceeded).status_and_code(),
            (429, "rate_limited")
        );
    }

    #[test]
    fn rate_limit_errors_carry_retry_hints() {
        assert!(ServiceError::GitHub(GitHubError::RateLimited)
            .hint()
            .expect("hint")
            .contains("retry later"));
        assert!(ServiceError::EmptyRepository.hint().is_none());
    }
}
