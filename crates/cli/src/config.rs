use repolens_context::ContextLimits;
use repolens_summarizer::SummarizerConfig;
use thiserror::Error;

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const LLM_API_KEY_ENV: &str = "REPOLENS_LLM_API_KEY";
pub const LLM_BASE_URL_ENV: &str = "REPOLENS_LLM_BASE_URL";
pub const LLM_MODEL_ENV: &str = "REPOLENS_LLM_MODEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{LLM_API_KEY_ENV} environment variable is not set")]
    MissingLlmApiKey,
}

/// Process-level configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional token for the GitHub API; raises rate limits when present.
    pub github_token: Option<String>,
    pub summarizer: SummarizerConfig,
    pub limits: ContextLimits,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let summarizer = summarizer_config(
            non_empty_env(LLM_API_KEY_ENV),
            non_empty_env(LLM_BASE_URL_ENV),
            non_empty_env(LLM_MODEL_ENV),
        )?;
        Ok(Self {
            github_token: non_empty_env(GITHUB_TOKEN_ENV),
            summarizer,
            limits: ContextLimits::from_env(),
        })
    }
}

fn summarizer_config(
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
) -> Result<SummarizerConfig, ConfigError> {
    let api_key = api_key.ok_or(ConfigError::MissingLlmApiKey)?;
    let mut config = SummarizerConfig::new(api_key);
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(model) = model {
        config = config.with_model(model);
    }
    Ok(config)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
