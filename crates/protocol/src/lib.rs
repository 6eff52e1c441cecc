use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors produced while parsing a repository URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoUrlError {
    #[error("Invalid repository URL '{0}'. Expected format: https://github.com/owner/repo")]
    Malformed(String),
}

/// A repository identified by owner and name, before the ref is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

fn repo_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$")
            .unwrap_or_else(|_| unreachable!("repo URL pattern is valid"))
    })
}

impl RepoSlug {
    /// Parse `https://github.com/{owner}/{name}` (trailing slash tolerated).
    pub fn parse_url(raw: &str) -> Result<Self, RepoUrlError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if !repo_url_pattern().is_match(trimmed) {
            return Err(RepoUrlError::Malformed(raw.trim().to_string()));
        }

        let mut segments = trimmed.rsplit('/');
        let name = segments.next().unwrap_or_default().to_string();
        let owner = segments.next().unwrap_or_default().to_string();
        Ok(Self { owner, name })
    }

    /// Attach a resolved ref (normally the default branch).
    pub fn at_ref(self, git_ref: impl Into<String>) -> RepoRef {
        RepoRef {
            owner: self.owner,
            name: self.name,
            git_ref: git_ref.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A fully resolved repository reference. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// Resolved ref, normally the repository's default branch.
    pub git_ref: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.git_ref)
    }
}

/// Inbound body of `POST /summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeRequest {
    pub repository_url: String,
}

/// Structured summary returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// What the project does, its purpose, and who it is for.
    pub overview: String,
    /// Main languages, frameworks, and tools, ordered by importance.
    pub technologies: Vec<String>,
    /// How the repository is organized.
    pub structure_notes: String,
}

/// Error body returned on any failed request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorEnvelope {
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
