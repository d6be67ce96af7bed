use crate::connection::Endpoint;
use crate::template::FormatSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub password: String,

    pub format: String,
    pub format_off: String,

    pub interval_secs: u64,
    pub timeout_ms: u64,
    pub capacity: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6600,
            password: String::new(),
            format: "%artist - %title".to_string(),
            format_off: "mpd: off".to_string(),
            interval_secs: 5,
            timeout_ms: 2000,
            capacity: 4096,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `MPD_HOST` (`host` or `password@host`) and `MPD_PORT` from the environment.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = var("MPD_HOST").filter(|h| !h.is_empty()) {
            match host.rsplit_once('@') {
                Some((password, host)) if !password.is_empty() && !host.is_empty() => {
                    self.password = password.to_string();
                    self.host = host.to_string();
                }
                _ => self.host = host.clone(),
            }
        }
        if let Some(port) = var("MPD_PORT").filter(|p| !p.is_empty()) {
            self.port = port
                .parse()
                .with_context(|| format!("invalid MPD_PORT {:?}", port))?;
        }
        Ok(self)
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            port: self.port,
            password: self.password.clone(),
        }
    }

    pub fn format_spec(&self) -> FormatSpec {
        FormatSpec {
            format: self.format.clone(),
            fallback: self.format_off.clone(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Reads the config file, falling back to defaults when it doesn't exist.
pub async fn read_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config = match fs::read_to_string(path).await {
        Ok(text) => Config::parse(&text).with_context(|| format!("parsing {}", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
    };
    config.with_env(|name| std::env::var(name).ok())
}
