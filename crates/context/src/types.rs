use serde::{Deserialize, Serialize};

/// Kind of a node in the remote file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of the remote file listing, relative to the repository root.
///
/// Produced once per request from the listing API and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    pub kind: EntryKind,
    /// Size in bytes. Zero for directories.
    pub size: u64,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }
}

pub(crate) fn depth_of(path: &str) -> usize {
    path.matches('/').count()
}

pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Why a file was left out of the assembled context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// A path segment names a dependency/build/VCS/cache directory.
    ExcludedDirectory,
    /// The file extension marks binary, media, archive, or generated content.
    BinaryExtension,
    /// The file is a dependency lock file.
    LockFile,
    /// The file exceeds the oversize byte threshold.
    Oversized,
    /// The file matched no scoring category and is never fetched.
    Unscored,
    /// The fetch for this file failed; assembly continued without it.
    FetchFailed { detail: String },
    /// Admission stopped before this file because the budget was exhausted.
    BudgetOmitted,
    /// The file ranked below the per-request fetch-count cap.
    FetchCapExceeded,
}
