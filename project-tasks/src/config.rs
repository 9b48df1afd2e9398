//! Configuration loading for project-tasks
//!
//! Configuration is loaded from:
//! 1. Environment variables `PROJECT_TASKS_API_URL` and `GITHUB_ORG`
//! 2. The file named by `PROJECT_TASKS_CONFIG`
//! 3. `<config dir>/project-tasks/config.toml`
//! 4. Default values
//!
//! The credential is not part of the file. It is resolved once at the
//! boundary with [`Credential::resolve`] and handed to the transport.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, ProjectResult};

/// Largest page the Projects API will serve
pub const MAX_PAGE_SIZE: u32 = 100;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub endpoint and credential sourcing
    #[serde(default)]
    pub github: GitHubConfig,
    /// Pagination limits
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GraphQL endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Organization used when a call does not name one
    #[serde(default)]
    pub default_org: Option<String>,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Items requested per page (capped at 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Timeout applied to each page request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Upper bound on pages per fetch session
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    concat!("project-tasks/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_pages() -> usize {
    1_000
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            default_org: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            max_pages: default_max_pages(),
        }
    }
}

impl FetchConfig {
    /// Page size clamped to what the API accepts
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Config {
    /// Load configuration from the default location or use defaults
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path().as_deref())
    }

    /// Load configuration from an explicit file, then apply env overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            Some(path) => {
                tracing::debug!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = non_blank_env("PROJECT_TASKS_API_URL") {
            self.github.api_url = url;
        }
        if let Some(org) = non_blank_env("GITHUB_ORG") {
            self.github.default_org = Some(org);
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PROJECT_TASKS_CONFIG") {
            return Some(PathBuf::from(path));
        }

        dirs::config_dir().map(|dir| dir.join("project-tasks").join("config.toml"))
    }

    /// Pick the organization for a call: explicit value first, then config
    pub fn resolve_org(&self, explicit: Option<&str>) -> ProjectResult<String> {
        explicit
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .map(str::to_string)
            .or_else(|| self.github.default_org.clone())
            .ok_or_else(|| {
                ProjectError::usage(
                    "organization is required: pass --org / `org` or set GITHUB_ORG",
                )
            })
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Bearer credential for the GraphQL API
///
/// The value is never printed; `Debug` shows a placeholder.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Resolve the credential from an explicit value or the named env var.
    ///
    /// Blank values count as absent. Returns a usage error when neither
    /// source yields a token, so callers fail before touching the network.
    pub fn resolve(explicit: Option<String>, env_var: &str) -> ProjectResult<Self> {
        explicit
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .or_else(|| non_blank_env(env_var))
            .map(Credential)
            .ok_or_else(|| {
                ProjectError::usage(format!(
                    "GitHub token is required: pass it explicitly or set {}",
                    env_var
                ))
            })
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
