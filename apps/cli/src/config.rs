//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/modninja/config.toml`
//! - Windows: `%APPDATA%/modninja/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use modninja_discovery::DEFAULT_APP_NAME;
use modninja_igdb::IgdbConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// IGDB (Twitch) client id.
    #[serde(default)]
    pub client_id: String,

    /// IGDB (Twitch) client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Timeout applied to every cover service request.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Application folder name discovery looks for under each base dir.
    #[serde(default = "default_app_name")]
    pub discovery_app_name: String,

    /// Where the store and cover cache live. Defaults next to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            http_timeout_secs: default_http_timeout(),
            discovery_app_name: default_app_name(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // The file holds the client secret.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Resolves the data directory: the override, or the config directory.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_base_dir()?.join("modninja")),
        }
    }

    /// IGDB client settings for the public endpoints.
    pub fn igdb(&self) -> IgdbConfig {
        IgdbConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            ..IgdbConfig::new(&self.client_id, &self.client_secret)
        }
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("modninja").join("config.toml"))
}

fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var_os("APPDATA")
            .ok_or_else(|| anyhow::anyhow!("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata))
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(xdg));
        }
        let home = std::env::var_os("HOME").ok_or_else(|| anyhow::anyhow!("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config"))
    }
}
