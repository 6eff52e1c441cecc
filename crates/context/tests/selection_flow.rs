//! End-to-end selection pipeline over a small fixture listing.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use repolens_context::{
    assemble, ContentFetcher, ContextLimits, FetchError, SkipReason, TreeEntry,
};
use std::collections::HashMap;
use std::sync::Arc;

struct MapFetcher {
    contents: HashMap<String, String>,
}

impl MapFetcher {
    fn new(contents: &[(&str, &str)]) -> Self {
        Self {
            contents: contents
                .iter()
                .map(|(path, text)| (path.to_string(), text.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl ContentFetcher for MapFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}

#[tokio::test]
async fn mixed_repository_is_filtered_scored_and_assembled() {
    let entries = vec![
        TreeEntry::file("README.md", 1_200),
        TreeEntry::directory("src"),
        TreeEntry::file("src/main.py", 800),
        TreeEntry::file("package-lock.json", 40_000),
        TreeEntry::directory("node_modules"),
        TreeEntry::file("node_modules/lodash/index.js", 5_000),
        TreeEntry::file("image.png", 9_000),
    ];
    let fetcher = Arc::new(MapFetcher::new(&[
        ("README.md", "# Demo\n\nA small demo project.\n"),
        ("src/main.py", "print('hello')\n"),
    ]));

    let context = assemble(&entries, fetcher, &ContextLimits::default()).await;

    let included: Vec<&str> = context.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(included, vec!["README.md", "src/main.py"]);

    let reasons: HashMap<&str, &SkipReason> = context
        .skipped
        .iter()
        .map(|s| (s.path.as_str(), &s.reason))
        .collect();
    assert_eq!(reasons["package-lock.json"], &SkipReason::LockFile);
    assert_eq!(
        reasons["node_modules/lodash/index.js"],
        &SkipReason::ExcludedDirectory
    );
    assert_eq!(reasons["image.png"], &SkipReason::BinaryExtension);

    // The tree shows everything, including content-skipped entries.
    let payload = context.render_payload();
    assert!(payload.contains("node_modules/"));
    assert!(payload.contains("image.png"));
    assert!(payload.contains("## File: README.md"));
    assert!(payload.contains("print('hello')"));

    assert!(context.total_chars <= ContextLimits::default().max_total_chars);
    assert_eq!(payload.chars().count(), context.total_chars);
}
