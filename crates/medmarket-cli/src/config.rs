use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileConfig {
    pub api_url: Option<String>,
    pub format: Option<String>,
}

impl ProfileConfig {
    pub fn output_format(&self) -> Option<OutputFormat> {
        let raw = self.format.as_deref()?;
        match OutputFormat::from_str(raw, true) {
            Ok(format) => Some(format),
            Err(_) => {
                tracing::warn!(format = raw, "Ignoring unknown output format in config");
                None
            }
        }
    }

    /// Apply `key = value`, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                url::Url::parse(value).with_context(|| format!("Invalid URL: {value}"))?;
                self.api_url = Some(value.to_string());
            }
            "format" => {
                OutputFormat::from_str(value, true)
                    .map_err(|e| anyhow::anyhow!("Invalid format: {e}"))?;
                self.format = Some(value.to_ascii_lowercase());
            }
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: api_url, format"),
        }
        Ok(())
    }
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

/// `~/.medmarket`, unless overridden.
pub fn config_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::home_dir()
            .context("Cannot determine home directory")?
            .join(".medmarket"),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
    Ok(dir)
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

pub fn load_all(dir: &Path) -> Result<ConfigFile> {
    let path = config_path(dir);
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(cfg)
}

pub fn load_profile(dir: &Path, profile: &str) -> Result<ProfileConfig> {
    Ok(load_all(dir)?.remove(profile).unwrap_or_default())
}

pub fn save_profile(dir: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all(dir)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path(dir), content)?;
    Ok(())
}

pub fn resolve_api_url(cli_url: Option<&str>, profile: &ProfileConfig) -> String {
    // 1. --api-url flag / MEDMARKET_API_URL env
    if let Some(url) = cli_url.filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    // 2. config.toml profile
    if let Some(url) = &profile.api_url {
        return url.clone();
    }
    // 3. local development backend
    DEFAULT_API_URL.to_string()
}
