//! Configuration for the MovieMetrics analytics CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

/// API section
#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    /// MovieMetrics API base URL, e.g. "https://moviemetrics.example.com/api/v1"
    pub base_url: Option<String>,
    /// Optional API key sent as a bearer token
    pub key: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "Failed to parse config.toml")
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL without trailing slash
    pub api_base: String,
    /// Optional API key
    pub api_key: Option<String>,
}

impl Config {
    /// Create config from file config and optional CLI base URL override
    pub fn from_file(file_config: &FileConfig, api_url: Option<String>) -> Self {
        let api_base = api_url
            .or_else(|| file_config.api.base_url.clone())
            .unwrap_or_else(|| constants::DEFAULT_API_BASE.to_string());

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: file_config.api.key.clone(),
        }
    }

    /// Full URL for the movies collection
    pub fn movies_url(&self) -> String {
        format!("{}{}", self.api_base, constants::MOVIES_ENDPOINT)
    }

    /// Full URL for the analytics aggregate
    pub fn analytics_url(&self) -> String {
        format!("{}{}", self.api_base, constants::ANALYTICS_ENDPOINT)
    }
}
