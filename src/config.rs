//! Client configuration.
//!
//! Values are layered: built-in defaults, then the TOML config file, then `ENCLONE_SERVER`,
//! then command-line flags. The resolved endpoint is fixed for the lifetime of the process.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_ENV: &str = "ENCLONE_SERVER";
const APP_DIR: &str = "enclone-client";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Per-call deadline applied by the transport; `None` waits as long as the server takes.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            connect_timeout: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    /// Capture mouse motion so hovering the diagram shows tooltips.
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Default log file used while the terminal UI owns the screen.
#[cfg(feature = "tui")]
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("client.log")
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse config")
    }

    /// Read `explicit` if given (it must exist), else the default path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Apply a `host:port` override such as the value of `ENCLONE_SERVER`.
    pub fn apply_server_override(&mut self, value: &str) -> Result<()> {
        let value = value.trim();
        let Some((host, port)) = value.rsplit_once(':') else {
            bail!("expected host:port, got {value:?}");
        };
        if host.is_empty() {
            bail!("missing host in {value:?}");
        }
        self.server.port = port
            .parse()
            .with_context(|| format!("invalid port in {value:?}"))?;
        self.server.host = host.to_string();
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(SERVER_ENV) {
            self.apply_server_override(&value)
                .with_context(|| format!("{SERVER_ENV} is invalid"))?;
        }
        Ok(())
    }
}
