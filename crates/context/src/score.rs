//! Priority scoring for content candidates.
//!
//! The ordering is a heuristic, not a guarantee: README and entry points are
//! the highest-value, lowest-volume signal; manifests cheaply enumerate the
//! dependency graph; deployment/CI config reveals how the project ships; and
//! shallow files are assumed architecturally more significant than deep
//! implementation detail. Files matching no category are never fetched, so
//! the scorer doubles as an allow-list.

use serde::{Deserialize, Serialize};

use crate::types::{depth_of, file_name};

/// Category of a scored file, in descending priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Readme,
    Entrypoint,
    Manifest,
    Config,
    TopLevelSource,
    OtherSource,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Readme => "readme",
            Category::Entrypoint => "entrypoint",
            Category::Manifest => "manifest",
            Category::Config => "config",
            Category::TopLevelSource => "top_level_source",
            Category::OtherSource => "other_source",
        }
    }
}

/// A content candidate with its priority key.
///
/// The derived ordering is (category, depth, path) ascending, which is a
/// total order: no two distinct paths ever tie, so repeated runs over an
/// unchanged listing select and order files identically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub category: Category,
    pub depth: usize,
    pub path: String,
}

/// Assign a category to a path, first match wins. `None` means the file is
/// outside every category and must not be fetched.
pub fn score(path: &str) -> Option<ScoredEntry> {
    let name = file_name(path);
    let depth = depth_of(path);

    let category = if is_readme(name) {
        Category::Readme
    } else if is_entry_point(name) {
        Category::Entrypoint
    } else if MANIFEST_FILE_NAMES.contains(&name) {
        Category::Manifest
    } else if CONFIG_FILE_NAMES.contains(&name) || is_ci_workflow(path) {
        Category::Config
    } else if has_source_extension(name) {
        if depth <= TOP_LEVEL_MAX_DEPTH {
            Category::TopLevelSource
        } else {
            Category::OtherSource
        }
    } else {
        return None;
    };

    Some(ScoredEntry {
        category,
        depth,
        path: path.to_string(),
    })
}

fn is_readme(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.starts_with("readme")
}

fn is_entry_point(name: &str) -> bool {
    if !has_source_extension(name) {
        return false;
    }
    let stem = name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(name)
        .to_lowercase();
    ENTRY_POINT_STEMS.contains(&stem.as_str())
}

fn is_ci_workflow(path: &str) -> bool {
    path.starts_with(".github/workflows/") && (path.ends_with(".yml") || path.ends_with(".yaml"))
}

fn has_source_extension(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_lowercase();
    SOURCE_EXTENSIONS.iter().any(|candidate| candidate == &ext)
}

/// Files deeper than this are "other source" even when recognized.
const TOP_LEVEL_MAX_DEPTH: usize = 1;

/// Conventional execution starting points across ecosystems.
const ENTRY_POINT_STEMS: &[&str] = &["main", "app", "index", "server", "cli", "__main__", "mod"];

/// Package/module manifests declaring dependencies and metadata.
const MANIFEST_FILE_NAMES: &[&str] = &[
    "package.json",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "Cargo.toml",
    "go.mod",
    "Gemfile",
    "build.gradle",
    "pom.xml",
    "composer.json",
    "mix.exs",
    "Makefile",
    "CMakeLists.txt",
];

/// Deployment, container, and tooling configuration worth surfacing.
const CONFIG_FILE_NAMES: &[&str] = &[
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".env.example",
    "Procfile",
    "app.yaml",
    "vercel.json",
    "netlify.toml",
    "fly.toml",
    "tsconfig.json",
    "webpack.config.js",
    "vite.config.ts",
    "vite.config.js",
    "rollup.config.js",
    "babel.config.js",
    ".babelrc",
    "jest.config.js",
    "jest.config.ts",
    "vitest.config.ts",
    "tox.ini",
    "pytest.ini",
];

/// Recognized source-code extensions (compared without the dot, lowercase).
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "go", "rs", "rb", "java", "kt", "cs", "cpp", "c", "h", "hpp",
    "swift", "m", "php", "ex", "exs", "erl", "hs", "lua", "r", "scala", "clj", "sh", "bash", "zsh",
    "sql", "graphql", "proto", "vue", "svelte", "astro", "html", "css", "scss", "less",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn category_of(path: &str) -> Option<Category> {
        score(path).map(|s| s.category)
    }

    #[test]
    fn readme_outranks_everything() {
        assert_eq!(category_of("README.md"), Some(Category::Readme));
        assert_eq!(category_of("readme.rst"), Some(Category::Readme));
        assert_eq!(category_of("docs/ReadMe.txt"), Some(Category::Readme));
    }

    #[test]
    fn entry_points_need_a_source_extension() {
        assert_eq!(category_of("src/main.py"), Some(Category::Entrypoint));
        assert_eq!(category_of("index.js"), Some(Category::Entrypoint));
        assert_eq!(category_of("cmd/server.go"), Some(Category::Entrypoint));
        // "main.txt" is not an entry point and .txt is not a source extension.
        assert_eq!(category_of("main.txt"), None);
    }

    #[test]
    fn manifests_and_configs_are_recognized_by_name() {
        assert_eq!(category_of("Cargo.toml"), Some(Category::Manifest));
        assert_eq!(category_of("backend/package.json"), Some(Category::Manifest));
        assert_eq!(category_of("Dockerfile"), Some(Category::Config));
        assert_eq!(
            category_of(".github/workflows/ci.yml"),
            Some(Category::Config)
        );
    }

    #[test]
    fn source_depth_splits_top_level_from_other() {
        assert_eq!(category_of("util.rs"), Some(Category::TopLevelSource));
        assert_eq!(category_of("src/util.rs"), Some(Category::TopLevelSource));
        assert_eq!(
            category_of("src/internal/util.rs"),
            Some(Category::OtherSource)
        );
    }

    #[test]
    fn unrecognized_files_are_never_scored() {
        assert_eq!(category_of("docs/deep/notes.md"), None);
        assert_eq!(category_of("data.csv"), None);
        assert_eq!(category_of("LICENSE"), None);
    }

    #[test]
    fn ordering_is_total_and_deterministic() {
        let mut entries: Vec<ScoredEntry> = [
            "src/internal/util.py",
            "src/main.py",
            "README.md",
            "Cargo.toml",
            "Dockerfile",
            "lib.rs",
            "src/helper.py",
        ]
        .iter()
        .filter_map(|p| score(p))
        .collect();

        entries.sort();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "README.md",
                "src/main.py",
                "Cargo.toml",
                "Dockerfile",
                "lib.rs",
                "src/helper.py",
                "src/internal/util.py",
            ]
        );

        // Same category and depth fall back to lexical path order.
        let a = score("src/alpha.py").expect("scored");
        let b = score("src/beta.py").expect("scored");
        assert!(a < b);
    }
}
