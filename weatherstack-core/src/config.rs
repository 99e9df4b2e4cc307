use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf};

/// Environment variable that overrides the stored access key.
pub const ACCESS_KEY_ENV: &str = "WEATHERSTACK_ACCESS_KEY";
/// Environment variable that overrides the stored base URL.
pub const BASE_URL_ENV: &str = "WEATHERSTACK_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";

/// What the dashboard keeps on screen when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Previous snapshot stays visible next to the error.
    #[default]
    KeepStale,
    /// Previous snapshot is dropped.
    Clear,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// base_url = "http://api.weatherstack.com"
/// timeout_secs = 10
/// on_failure = "keep_stale"
/// ```
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub access_key: Option<String>,

    /// Falls back to [`DEFAULT_BASE_URL`] when unset.
    pub base_url: Option<String>,

    /// Unset means the HTTP client's own defaults.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("on_failure", &self.on_failure)
            .finish()
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load from disk and apply process environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ACCESS_KEY_ENV) {
            self.access_key = Some(key);
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherstack", "weatherstack-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_access_key(&mut self, access_key: String) {
        self.access_key = Some(access_key);
    }

    /// Returns the access key, or an error telling the user how to set one.
    pub fn require_access_key(&self) -> Result<&str> {
        self.access_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No Weatherstack access key configured.\n\
                     Hint: run `weatherstack configure` or set {ACCESS_KEY_ENV}."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
