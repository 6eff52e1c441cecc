use crate::types::{file_name, EntryKind, SkipReason};

/// Content-inclusion decision for a single file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Include,
    Skip(SkipReason),
}

/// Decide from path metadata alone whether an entry is a content candidate.
///
/// Returns `None` for directories: they are never fetched as content and
/// only shape the tree rendering and the segment-based exclusion of their
/// descendants. Pure function, no I/O.
pub fn classify(path: &str, kind: EntryKind, size: u64) -> Option<Decision> {
    if kind == EntryKind::Directory {
        return None;
    }
    Some(classify_file(path, size))
}

fn classify_file(path: &str, size: u64) -> Decision {
    if has_excluded_segment(path) {
        return Decision::Skip(SkipReason::ExcludedDirectory);
    }
    if LOCK_FILE_NAMES.contains(&file_name(path)) {
        return Decision::Skip(SkipReason::LockFile);
    }
    if has_binary_suffix(path) {
        return Decision::Skip(SkipReason::BinaryExtension);
    }
    if size > OVERSIZE_BYTES {
        return Decision::Skip(SkipReason::Oversized);
    }
    Decision::Include
}

fn has_excluded_segment(path: &str) -> bool {
    path.split('/')
        .any(|segment| EXCLUDED_DIRECTORIES.contains(&segment))
}

fn has_binary_suffix(path: &str) -> bool {
    let lowered = path.to_lowercase();
    BINARY_SUFFIXES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
}

/// Files larger than this are skipped regardless of name or category.
pub const OVERSIZE_BYTES: u64 = 500_000;

/// Directory segment names excluded from content fetching. Matched exactly
/// and case-sensitively against every path segment, not just the leaf.
const EXCLUDED_DIRECTORIES: &[&str] = &[
    // dependencies / vendored code
    "node_modules",
    "vendor",
    "bower_components",
    "jspm_packages",
    // VCS / IDE
    ".git",
    ".idea",
    ".vscode",
    ".vs",
    // build output
    "dist",
    "build",
    "target",
    "out",
    "coverage",
    ".next",
    ".nuxt",
    // caches
    "__pycache__",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".nyc_output",
    ".cache",
    ".gradle",
    // virtual environments
    "venv",
    ".venv",
    "env",
    ".env",
    "eggs",
    ".eggs",
    // scratch
    "tmp",
    "temp",
];

/// Suffixes of binary, media, archive, and generated files. Compared
/// case-insensitively against the full path so multi-part suffixes like
/// `.min.js` match as well.
const BINARY_SUFFIXES: &[&str] = &[
    // images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".webp",
    // audio / video
    ".mp3", ".mp4", ".avi", ".mov", ".wav", ".flac",
    // archives
    ".zip", ".tar", ".gz", ".bz2", ".xz", ".rar", ".7z",
    // fonts
    ".woff", ".woff2", ".ttf", ".eot", ".otf",
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
    // executables / objects
    ".exe", ".dll", ".so", ".dylib", ".bin", ".o", ".a", ".class",
    ".pyc", ".pyo", ".wasm", ".map",
    // lock-style suffixes
    ".lock", ".sum",
    // minified bundles
    ".min.js", ".min.css", ".bundle.js",
    ".ds_store",
];

/// Known lock files, matched exactly against the file name.
const LOCK_FILE_NAMES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Pipfile.lock",
    "poetry.lock",
    "composer.lock",
    "Gemfile.lock",
    "Cargo.lock",
    "go.sum",
    "bun.lockb",
    ".DS_Store",
    "Thumbs.db",
    ".gitattributes",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify_file_entry(path: &str, size: u64) -> Decision {
        classify(path, EntryKind::File, size).expect("files always get a decision")
    }

    #[test]
    fn excluded_segments_win_regardless_of_extension() {
        for path in [
            "node_modules/lodash/index.js",
            "pkg/node_modules/x.py",
            "target/debug/build.rs",
            ".git/config",
            "a/b/__pycache__/mod.pyc",
        ] {
            assert_eq!(
                classify_file_entry(path, 10),
                Decision::Skip(SkipReason::ExcludedDirectory),
                "path: {path}"
            );
        }
    }

    #[test]
    fn segment_matching_is_exact_and_case_sensitive() {
        // "Target" and "my_vendor" are not the excluded segment names.
        assert_eq!(classify_file_entry("Target/main.rs", 10), Decision::Include);
        assert_eq!(
            classify_file_entry("my_vendor/lib.rs", 10),
            Decision::Include
        );
    }

    #[test]
    fn binary_extensions_match_case_insensitively() {
        assert_eq!(
            classify_file_entry("assets/logo.PNG", 10),
            Decision::Skip(SkipReason::BinaryExtension)
        );
        assert_eq!(
            classify_file_entry("assets/logo.png", 10),
            Decision::Skip(SkipReason::BinaryExtension)
        );
        assert_eq!(
            classify_file_entry("static/app.min.js", 10),
            Decision::Skip(SkipReason::BinaryExtension)
        );
    }

    #[test]
    fn lock_files_are_reported_as_lock_files() {
        // Cargo.lock also carries a ".lock" suffix; the file-name rule is
        // checked first so the reason stays the specific one.
        for name in ["package-lock.json", "Cargo.lock", "go.sum", "yarn.lock"] {
            assert_eq!(
                classify_file_entry(name, 10),
                Decision::Skip(SkipReason::LockFile),
                "name: {name}"
            );
        }
    }

    #[test]
    fn oversized_files_are_skipped_even_when_high_value() {
        assert_eq!(
            classify_file_entry("README.md", OVERSIZE_BYTES + 1),
            Decision::Skip(SkipReason::Oversized)
        );
        assert_eq!(
            classify_file_entry("README.md", OVERSIZE_BYTES),
            Decision::Include
        );
    }

    #[test]
    fn directories_are_never_content_candidates() {
        assert_eq!(classify("src", EntryKind::Directory, 0), None);
        assert_eq!(
            classify("node_modules", EntryKind::Directory, 0),
            None
        );
    }

    #[test]
    fn ordinary_source_files_are_included() {
        assert_eq!(classify_file_entry("src/main.py", 1_000), Decision::Include);
        assert_eq!(classify_file_entry("README.md", 1_000), Decision::Include);
    }
}
