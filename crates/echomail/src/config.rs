//! Client configuration
//!
//! Loaded from (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `echomail.json` in the EchoMail config directory
//! 3. Environment variables (`ECHOMAIL_API_URL`, `ECHOMAIL_SESSION_COOKIE`,
//!    `ECHOMAIL_BEARER_TOKEN`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config filename in the EchoMail config directory
const CONFIG_FILE: &str = "echomail.json";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_AUTH_SOURCE: &str = "gmail";
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Session credentials attached to every provider request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Credentials {
    /// Raw `Cookie` header value of a logged-in session
    Cookie(String),
    /// Token sent as `Authorization: Bearer <token>`
    Bearer(String),
}

/// Where list pagination happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
    /// One provider request per page, using continuation tokens
    #[default]
    Provider,
    /// Fetch the whole folder once, then filter and slice locally
    Client,
}

/// Settings for talking to the mail backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the backend serving `/api/gmail/*`
    pub api_url: String,
    /// `source` parameter sent when requesting access
    pub auth_source: String,
    pub credentials: Option<Credentials>,
    /// Emails per list page
    pub page_size: u32,
    pub paging: PagingMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_source: DEFAULT_AUTH_SOURCE.to_string(),
            credentials: None,
            page_size: DEFAULT_PAGE_SIZE,
            paging: PagingMode::default(),
        }
    }
}

impl ClientConfig {
    /// Load the config file if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = if config::config_exists(CONFIG_FILE) {
            config::load_json(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config
            .with_env_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Load from a specific JSON file, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = config::load_json_file(path)?;
        config.validated()
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse client config JSON")?;
        config.validated()
    }

    /// Write the config to the EchoMail config directory
    pub fn save(&self) -> Result<PathBuf> {
        config::save_json(CONFIG_FILE, self)
    }

    /// Default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }

    fn validated(self) -> Result<Self> {
        if self.page_size == 0 {
            anyhow::bail!("pageSize must be at least 1");
        }
        url::Url::parse(&self.api_url)
            .with_context(|| format!("Invalid apiUrl: {}", self.api_url))?;
        Ok(self)
    }

    /// Apply overrides from an environment lookup
    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(api_url) = lookup("ECHOMAIL_API_URL") {
            self.api_url = api_url;
        }
        if let Some(cookie) = lookup("ECHOMAIL_SESSION_COOKIE") {
            self.credentials = Some(Credentials::Cookie(cookie));
        }
        if let Some(token) = lookup("ECHOMAIL_BEARER_TOKEN") {
            self.credentials = Some(Credentials::Bearer(token));
        }
        self
    }
}
