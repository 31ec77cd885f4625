use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub github: GitHubConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Absent token degrades to unauthenticated, rate-limited access.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_project_number")]
    pub project_number: u64,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("project_number", &self.project_number)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactConfig {
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_brief_dir")]
    pub brief_dir: PathBuf,
    #[serde(default = "default_approvals_dir")]
    pub approvals_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            brief_dir: default_brief_dir(),
            approvals_dir: default_approvals_dir(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_project_number() -> u64 {
    2
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("COCKPIT/artifacts/TRAE_REVIEW")
}

fn default_brief_dir() -> PathBuf {
    PathBuf::from("COCKPIT/artifacts/DAILY_BRIEF")
}

fn default_approvals_dir() -> PathBuf {
    PathBuf::from("COCKPIT/artifacts/APPROVALS_QUEUE")
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            // Try default paths
            builder = builder.add_source(config::File::with_name("flightdeck").required(false));
        }

        // Environment variable overrides with FLIGHTDECK_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("FLIGHTDECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}
