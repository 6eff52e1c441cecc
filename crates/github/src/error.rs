use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Repository-level failures from the listing API. These are terminal for
/// the whole request, unlike per-file fetch failures.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("repository '{0}' not found; make sure it exists and is public")]
    RepoNotFound(String),

    #[error("access to repository '{0}' is forbidden")]
    RepoForbidden(String),

    #[error("GitHub API rate limit exceeded; try again later")]
    RateLimited,

    #[error("unexpected GitHub API response ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
