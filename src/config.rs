use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Environment variable holding the GitHub token.
pub const TOKEN_ENV: &str = "GH_REPO_TOKEN";
/// Environment variable holding the owning organization.
pub const ORG_ENV: &str = "GH_ORG_NAME";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub org: String,
    /// REST endpoint override, e.g. for GitHub Enterprise Server.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            org: String::new(),
            api_base_url: None,
            web_base_url: default_web_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"[REDACTED]")
            .field("org", &self.org)
            .field("api_base_url", &self.api_base_url)
            .field("web_base_url", &self.web_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl GitHubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_web_base_url() -> String {
    "https://github.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Load configuration, resolving the token and organization through `lookup`.
    pub fn load_with<F>(config_path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(
                config::File::with_name("repo-steward")
                    .required(false),
            );
        }

        // Environment variable overrides with REPO_STEWARD_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("REPO_STEWARD")
                .separator("__")
                .try_parsing(true),
        );

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        builder = builder
            .set_override_option("github.token", non_empty(TOKEN_ENV))?
            .set_override_option("github.org", non_empty(ORG_ENV))?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.github.token.trim().is_empty() {
            return Err(AppError::MissingSetting(TOKEN_ENV));
        }
        if self.github.org.trim().is_empty() {
            return Err(AppError::MissingSetting(ORG_ENV));
        }
        if self.github.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "github.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token(&self) -> &str {
        &self.github.token
    }
}
