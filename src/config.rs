// Hub configuration: a TOML file (optional) with environment overrides on top.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_PATH_VAR: &str = "TELEMETRYHUB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/telemetryhub.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cipher: CipherConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Pre-shared key and IV, taken as the raw bytes of each string.
/// Both must be configured; there is no built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CipherConfig {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub iv: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_refresh_seconds() -> u32 {
    5
}

fn default_title() -> String {
    "ESP32 Sensor Readings".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            refresh_seconds: default_refresh_seconds(),
            title: default_title(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl HubConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| anyhow!("failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Loads the file named by `TELEMETRYHUB_CONFIG` (or the default path),
    /// then applies `TELEMETRYHUB_*` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            let config = Self::from_file(&path)?;
            info!("Loaded config from {}", path.display());
            config
        } else {
            warn!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TELEMETRYHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_override(&lookup, "TELEMETRYHUB_PORT")? {
            self.server.port = port;
        }
        if let Some(key) = lookup("TELEMETRYHUB_CIPHER_KEY") {
            self.cipher.key = key;
        }
        if let Some(iv) = lookup("TELEMETRYHUB_CIPHER_IV") {
            self.cipher.iv = iv;
        }
        if let Some(refresh) = parse_override(&lookup, "TELEMETRYHUB_REFRESH_SECONDS")? {
            self.view.refresh_seconds = refresh;
        }
        self.validate()
    }

    // A zero reload delay makes every open dashboard reload in a tight loop.
    fn validate(&self) -> anyhow::Result<()> {
        if self.view.refresh_seconds == 0 {
            bail!("view.refresh_seconds must be at least 1");
        }
        Ok(())
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => {
            info!("{key} overrides config file value");
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}"))
        }
        None => Ok(None),
    }
}
