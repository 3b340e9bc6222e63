use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub devto: DevtoConfig,
    pub inference: InferenceConfig,
    pub log_level: LogLevel,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    /// Layers `config/default`, `config/local` and `__`-separated environment
    /// variables (`GITHUB__TOKEN`, `INFERENCE__TOP_REPO_N`, ...) over the
    /// built-in defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub user_agent: String,
    pub api_url: String,
    pub graphql_url: String,
    pub taxonomy_url: String,
}

impl GithubConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com/";
    pub const DEFAULT_GRAPHQL_URL: &'static str = "https://api.github.com/graphql";
    pub const DEFAULT_TAXONOMY_URL: &'static str =
        "https://raw.githubusercontent.com/supertypeai/collective/main/src/data/profileTagsChoices.json";

    /// Empty or whitespace-only tokens count as no token at all.
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            user_agent: "devprofile".to_string(),
            api_url: Self::DEFAULT_API_URL.to_string(),
            graphql_url: Self::DEFAULT_GRAPHQL_URL.to_string(),
            taxonomy_url: Self::DEFAULT_TAXONOMY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DevtoConfig {
    pub api_url: String,
}

impl Default for DevtoConfig {
    fn default() -> Self {
        Self {
            api_url: "https://dev.to/api/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub top_repo_n: usize,
    pub top_language_n: usize,
    pub include_private: bool,
    pub include_activity: bool,
    pub contributor_repo_limit: usize,
}

impl InferenceConfig {
    const fn default_top_n() -> usize {
        3
    }

    const fn default_contributor_repo_limit() -> usize {
        10
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            top_repo_n: Self::default_top_n(),
            top_language_n: Self::default_top_n(),
            include_private: false,
            include_activity: true,
            contributor_repo_limit: Self::default_contributor_repo_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
