//! Deterministic rendering of the full repository listing.
//!
//! The tree is structural context for the language model and is always
//! included whole, independent of which files the classifier later skips
//! for content. Pathologically large listings are an accepted limitation.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{EntryKind, TreeEntry};

#[derive(Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: BTreeSet<String>,
}

impl DirNode {
    fn dir_mut(&mut self, segments: &[&str]) -> &mut DirNode {
        let mut node = self;
        for segment in segments {
            node = node.dirs.entry((*segment).to_string()).or_default();
        }
        node
    }
}

/// Render the listing as a nested, two-space-indented tree. Directories are
/// suffixed with `/`; children are ordered lexically within each directory
/// (subdirectories and files interleaved). Output ends with a newline.
pub fn render(entries: &[TreeEntry]) -> String {
    let mut root = DirNode::default();

    for entry in entries {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }
        match entry.kind {
            EntryKind::Directory => {
                root.dir_mut(&segments);
            }
            EntryKind::File => {
                let (name, parents) = segments.split_last().unwrap_or((&"", &[]));
                root.dir_mut(parents).files.insert((*name).to_string());
            }
        }
    }

    let mut out = String::new();
    render_node(&root, 0, &mut out);
    out
}

fn render_node(node: &DirNode, depth: usize, out: &mut String) {
    // Merge subdirectories and files into one lexical order per directory.
    let mut names: Vec<(&str, bool)> = node
        .dirs
        .keys()
        .map(|name| (name.as_str(), true))
        .chain(node.files.iter().map(|name| (name.as_str(), false)))
        .collect();
    names.sort();

    for (name, is_dir) in names {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(name);
        if is_dir {
            out.push('/');
        }
        out.push('\n');
        if is_dir {
            if let Some(child) = node.dirs.get(name) {
                render_node(child, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_listing_with_lexical_order() {
        let entries = vec![
            TreeEntry::file("src/main.py", 10),
            TreeEntry::file("README.md", 5),
            TreeEntry::directory("src"),
            TreeEntry::file("src/util/helpers.py", 7),
            TreeEntry::file("Cargo.toml", 3),
        ];

        let rendered = render(&entries);
        assert_eq!(
            rendered,
            "Cargo.toml\nREADME.md\nsrc/\n  main.py\n  util/\n    helpers.py\n"
        );
    }

    #[test]
    fn includes_entries_the_classifier_would_skip() {
        let entries = vec![
            TreeEntry::file("node_modules/lodash/index.js", 100),
            TreeEntry::file("image.png", 100),
        ];

        let rendered = render(&entries);
        assert!(rendered.contains("node_modules/"));
        assert!(rendered.contains("image.png"));
    }

    #[test]
    fn directories_appear_even_without_files() {
        let entries = vec![TreeEntry::directory("docs"), TreeEntry::file("a.txt", 1)];
        assert_eq!(render(&entries), "a.txt\ndocs/\n");
    }

    #[test]
    fn rendering_is_deterministic_under_input_order() {
        let forward = vec![
            TreeEntry::file("b/x.py", 1),
            TreeEntry::file("a/y.py", 1),
            TreeEntry::file("top.py", 1),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(render(&forward), render(&reversed));
    }
}
