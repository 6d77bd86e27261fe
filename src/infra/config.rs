use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const BASE_URL_ENV: &str = "AMPLEDATA_API_URL";
pub const TOKEN_ENV: &str = "AMPLEDATA_API_TOKEN";

/// Where the client talks to and who it talks as. The token is minted by the
/// external identity provider; this client only stores and forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ApiConfig {
    /// Config file first, env vars on top. Never fails: a missing or broken
    /// file just means defaults.
    pub fn load() -> ApiConfig {
        let mut config = default_config_path()
            .ok()
            .and_then(|path| Self::load_file(&path).ok())
            .unwrap_or_default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                config.token = Some(token);
            }
        }
        config
    }

    pub fn load_file(path: &Path) -> Result<ApiConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn save_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config dir: {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_file(&default_config_path()?)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .as_deref()
            .map(|token| !token.trim().is_empty())
            .unwrap_or(false)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "ampledata", "ampledata")
        .ok_or_else(|| anyhow!("unable to resolve config directory"))?;
    Ok(project_dirs.config_dir().join("config.json"))
}
