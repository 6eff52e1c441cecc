use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a content fetch can fail with. Each is terminal for that one file
/// only; assembly continues with the remaining candidates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("remote API rate limit exceeded")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("content is not valid text: {0}")]
    Decode(String),
}

/// Capability to retrieve raw file content from the remote source.
///
/// Implementations must be safe to call concurrently for distinct paths; the
/// assembler bounds how many calls are in flight at once.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// A fetched file ready for assembly. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFile {
    pub path: String,
    /// Content text, at most the per-file character cap.
    pub content: String,
    /// True when the source content exceeded the cap and was cut.
    pub is_truncated: bool,
    /// Byte size of the source content before truncation.
    pub source_bytes: usize,
}

impl FetchedFile {
    /// Build from raw fetched text, truncating to `max_chars` characters.
    pub fn from_raw(path: impl Into<String>, raw: String, max_chars: usize) -> Self {
        let source_bytes = raw.len();
        let (content, is_truncated) = truncate_chars(raw, max_chars);
        Self {
            path: path.into(),
            content,
            is_truncated,
            source_bytes,
        }
    }
}

fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text, false),
        Some((cut, _)) => {
            let mut truncated = text;
            truncated.truncate(cut);
            (truncated, true)
        }
    }
}
