use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;
use taskdeck_shared::Filter;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const APP_DIR_NAME: &str = "taskdeck";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub default_filter: Filter,
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_filter: Filter::All,
            data_dir: None,
            log_dir: None,
            loaded_from: None,
        }
    }
}

impl Config {
    /// Reads `path` when given, otherwise the per-user config file if there
    /// is one. Missing default file means defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (Some(expand_tilde(path)), true),
            None => (default_config_path(), false),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut cfg = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        cfg.loaded_from = Some(path);
        Ok(cfg)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = toml::from_str(text)?;
        cfg.api_base()?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, api_url: Option<&Url>, filter: Option<Filter>) {
        if let Some(url) = api_url {
            debug!(%url, "api url overridden");
            self.api_url = url.to_string();
        }
        if let Some(filter) = filter {
            self.default_filter = filter;
        }
    }

    pub fn api_base(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("invalid api_url `{}`", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("api_url must be http or https, got `{}`", url.scheme()));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| anyhow!("could not determine a data directory, set data_dir")),
        }
    }

    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => Ok(self.data_dir()?.join("logs")),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
