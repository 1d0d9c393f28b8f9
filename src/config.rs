use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::FetchPolicy;
use crate::registry::{DEFAULT_REPOSITORY_URL, DEFAULT_SEARCH_URL};

/// Root configuration structure, deserialized from `.jar-license-inspector/config.toml`.
///
/// Every section and field is optional; missing values take the built-in defaults.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// Where artifacts are looked up.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Solr search endpoint answering `q=a:<name> AND v:<version>`.
    pub search_url: String,
    /// Root of the Maven repository layout (POMs and JARs).
    pub repository_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
        }
    }
}

/// Retry behaviour of every HTTP request.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub timeout_secs: u64,
    pub backoff_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            timeout_secs: policy.timeout.as_secs(),
            backoff_secs: policy.backoff.as_secs(),
        }
    }
}

impl FetchConfig {
    pub fn to_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_attempts: self.max_attempts.max(1),
            timeout: Duration::from_secs(self.timeout_secs),
            backoff: Duration::from_secs(self.backoff_secs),
        }
    }
}

/// Files written by a run.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Folder receiving `<key>.licence` files.
    pub licenses_dir: PathBuf,
    /// HTML report path.
    pub html: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            licenses_dir: PathBuf::from("licenses"),
            html: PathBuf::from("license.html"),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<base>/.jar-license-inspector/config.toml`
/// 3. `~/.config/jar-license-inspector/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base.join(".jar-license-inspector").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("jar-license-inspector")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}
