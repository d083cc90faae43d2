use std::env::VarError;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub connection: ConnectionConfig,
}

/// Per-connection limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Requests served on one connection before it is closed.
    pub max_keep_alive: usize,
    pub read_buffer_size: usize,
    /// Unset means reads block until the peer sends or closes.
    pub read_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_keep_alive: 300,
            read_buffer_size: 4096,
            read_timeout_secs: None,
        }
    }
}

impl ConnectionConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// YAML file from `FWEB_CONFIG` if set, else defaults; `LISTEN` overrides the address.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("FWEB_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(VarError::NotPresent) => Self::default(),
            Err(err) => return Err(err).context("invalid FWEB_CONFIG"),
        };
        match std::env::var("LISTEN") {
            Ok(listen_addr) => cfg.listen_addr = listen_addr,
            Err(VarError::NotPresent) => {}
            Err(err) => return Err(err).context("invalid LISTEN"),
        }
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
