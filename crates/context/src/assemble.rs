//! Budget-bounded assembly of the context payload.
//!
//! The assembler renders the tree, orders content candidates by priority,
//! fetches them concurrently under a semaphore, and admits fetched files
//! greedily in priority order until the character budget is exhausted.
//! Admission stops at the first file that does not fit; later files are
//! never substituted in, so behavior stays simple and predictable.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::classify::{classify, Decision};
use crate::fetch::{ContentFetcher, FetchError, FetchedFile};
use crate::limits::ContextLimits;
use crate::score::{score, ScoredEntry};
use crate::tree;
use crate::types::{SkipReason, TreeEntry};

/// A file left out of the payload, with the reason, for observability.
/// This report is never sent to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// The assembled payload plus its selection report. Owns its data
/// exclusively; nothing is shared with the fetch layer after assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Rendered tree section, always included in full.
    pub tree_text: String,
    /// Admitted files in priority order.
    pub files: Vec<FetchedFile>,
    /// Character count of the full rendered payload.
    pub total_chars: usize,
    /// Every skipped or omitted file with its reason.
    pub skipped: Vec<SkippedFile>,
}

impl AssembledContext {
    /// The payload handed to the summarizer: the tree section followed by
    /// one section per admitted file.
    pub fn render_payload(&self) -> String {
        let mut out = String::with_capacity(self.total_chars);
        out.push_str(&self.tree_text);
        for file in &self.files {
            out.push_str(&file_section(file));
        }
        out
    }
}

/// Wrap the rendered tree in its payload section.
pub fn tree_block(rendered_tree: &str) -> String {
    format!("## Directory Structure\n```\n{rendered_tree}```\n")
}

/// Render one admitted file as a payload section. The header carries the
/// relative path so the model can attribute content to a file.
pub fn file_section(file: &FetchedFile) -> String {
    let marker = if file.is_truncated { " (truncated)" } else { "" };
    format!(
        "\n## File: {}{marker}\n```\n{}\n```\n",
        file.path, file.content
    )
}

/// Assemble the context for one repository listing.
///
/// Deterministic for a fixed listing and fetcher behavior: candidate order
/// comes from the scorer's total order, never from fetch completion order.
pub async fn assemble(
    entries: &[TreeEntry],
    fetcher: Arc<dyn ContentFetcher>,
    limits: &ContextLimits,
) -> AssembledContext {
    let tree_text = tree_block(&tree::render(entries));

    let mut skipped = Vec::new();
    let mut candidates = Vec::new();
    for entry in entries {
        let Some(decision) = classify(&entry.path, entry.kind, entry.size) else {
            continue;
        };
        match decision {
            Decision::Skip(reason) => skipped.push(SkippedFile {
                path: entry.path.clone(),
                reason,
            }),
            Decision::Include => match score(&entry.path) {
                Some(scored) => candidates.push(scored),
                None => skipped.push(SkippedFile {
                    path: entry.path.clone(),
                    reason: SkipReason::Unscored,
                }),
            },
        }
    }
    candidates.sort();

    // Bound how many files are ever dispatched; entries past the cap are
    // reported rather than silently dropped.
    if candidates.len() > limits.max_files {
        for over in candidates.drain(limits.max_files..) {
            skipped.push(SkippedFile {
                path: over.path,
                reason: SkipReason::FetchCapExceeded,
            });
        }
    }

    log::debug!(
        "assembling context: {} candidates, {} pre-skipped",
        candidates.len(),
        skipped.len()
    );

    let results = fetch_all(&candidates, fetcher, limits.max_concurrency).await;

    let mut total_chars = tree_text.chars().count();
    let mut files = Vec::new();
    let mut budget_closed = false;

    for (candidate, result) in candidates.iter().zip(results) {
        if budget_closed {
            skipped.push(SkippedFile {
                path: candidate.path.clone(),
                reason: SkipReason::BudgetOmitted,
            });
            continue;
        }

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("fetch failed for {}: {err}", candidate.path);
                skipped.push(SkippedFile {
                    path: candidate.path.clone(),
                    reason: SkipReason::FetchFailed {
                        detail: err.to_string(),
                    },
                });
                continue;
            }
        };

        let fetched = FetchedFile::from_raw(&candidate.path, raw, limits.max_file_chars);
        let cost = file_section(&fetched).chars().count();
        if total_chars + cost <= limits.max_total_chars {
            total_chars += cost;
            files.push(fetched);
        } else {
            budget_closed = true;
            skipped.push(SkippedFile {
                path: candidate.path.clone(),
                reason: SkipReason::BudgetOmitted,
            });
        }
    }

    log::info!(
        "assembled context: {} files, {} chars, {} skipped",
        files.len(),
        total_chars,
        skipped.len()
    );

    AssembledContext {
        tree_text,
        files,
        total_chars,
        skipped,
    }
}

/// Fetch every candidate concurrently, bounded by `max_concurrency`
/// in-flight requests, and return results in candidate order.
async fn fetch_all(
    candidates: &[ScoredEntry],
    fetcher: Arc<dyn ContentFetcher>,
    max_concurrency: usize,
) -> Vec<Result<String, FetchError>> {
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let fetcher = fetcher.clone();
        let semaphore = semaphore.clone();
        let path = candidate.path.clone();
        join_set.spawn(async move {
            // The semaphore is never closed; acquire failures are not expected.
            let _permit = semaphore
                .acquire_owned()
                .await
                .unwrap_or_else(|_| unreachable!("fetch semaphore closed"));
            (index, fetcher.fetch(&path).await)
        });
    }

    let mut results: Vec<Result<String, FetchError>> =
        vec![Err(FetchError::Network("fetch task dropped".to_string())); candidates.len()];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = result,
            Err(err) => log::warn!("fetch task failed: {err}"),
        }
    }
    results
}
