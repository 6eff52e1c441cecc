use serde::{Deserialize, Serialize};

const DEFAULT_MAX_TOTAL_CHARS: usize = 80_000;
const DEFAULT_MAX_FILE_CHARS: usize = 15_000;
const DEFAULT_MAX_CONCURRENCY: usize = 10;
const DEFAULT_MAX_FILES: usize = 40;

const MAX_CONCURRENCY_CEILING: usize = 32;

/// Budget and concurrency limits for context assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimits {
    /// Hard cap on the whole assembled payload, in characters.
    pub max_total_chars: usize,
    /// Per-file content cap, in characters.
    pub max_file_chars: usize,
    /// Maximum simultaneously in-flight content fetches.
    pub max_concurrency: usize,
    /// Maximum number of files ever dispatched for fetching per request.
    pub max_files: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_total_chars: DEFAULT_MAX_TOTAL_CHARS,
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl ContextLimits {
    /// Read limits from the environment, falling back to defaults for unset
    /// or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_total_chars: parse_limit(
                std::env::var("REPOLENS_MAX_TOTAL_CHARS").ok().as_deref(),
                defaults.max_total_chars,
                1_000,
                usize::MAX,
            ),
            max_file_chars: parse_limit(
                std::env::var("REPOLENS_MAX_FILE_CHARS").ok().as_deref(),
                defaults.max_file_chars,
                100,
                usize::MAX,
            ),
            max_concurrency: parse_limit(
                std::env::var("REPOLENS_MAX_CONCURRENCY").ok().as_deref(),
                defaults.max_concurrency,
                1,
                MAX_CONCURRENCY_CEILING,
            ),
            max_files: parse_limit(
                std::env::var("REPOLENS_MAX_FILES").ok().as_deref(),
                defaults.max_files,
                1,
                usize::MAX,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_total_chars == 0 {
            return Err("max_total_chars must be > 0".to_string());
        }
        if self.max_file_chars == 0 {
            return Err("max_file_chars must be > 0".to_string());
        }
        if self.max_file_chars > self.max_total_chars {
            return Err(format!(
                "max_file_chars ({}) cannot exceed max_total_chars ({})",
                self.max_file_chars, self.max_total_chars
            ));
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be > 0".to_string());
        }
        if self.max_files == 0 {
            return Err("max_files must be > 0".to_string());
        }
        Ok(())
    }
}

fn parse_limit(raw: Option<&str>, default_value: usize, min: usize, max: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(min, max)
}
