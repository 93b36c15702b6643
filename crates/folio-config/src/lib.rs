//! Configuration for the folio relay and backdrop.
//!
//! Settings come from `config.toml` in the platform config directory, fall
//! back to defaults when the file is absent, and are finally overridden by
//! environment variables (`EMAIL_SERVICE`, `EMAIL_USER`, `EMAIL_PASSWORD`,
//! `PORT`, `FOLIO_HOST`).

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use folio_core::EffectSelection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("could not determine a config directory")]
    NoConfigDir,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub relay: RelayConfig,
    pub background: BackgroundConfig,
}

/// Mail relay settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Interface to listen on.
    pub host: String,
    pub port: u16,
    /// Mail service name (`gmail`, `outlook`, ...) or an SMTP host.
    pub mail_service: String,
    /// Mail account; notifications are sent from and to this address.
    pub mail_user: Option<String>,
    pub mail_password: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mail_service: "gmail".to_string(),
            mail_user: None,
            mail_password: None,
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mail_service", &self.mail_service)
            .field("mail_user", &self.mail_user)
            .field("has_password", &self.mail_password.is_some())
            .finish()
    }
}

impl RelayConfig {
    /// `host:port` to bind the HTTP listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Override the port from `PORT`, failing if it is not a port number.
    pub fn apply_port_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = non_empty(&lookup, "PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        Ok(())
    }

    /// SMTP host for the configured mail service.
    ///
    /// Well-known service names map to their submission hosts; anything else
    /// is taken to be a host name already.
    pub fn smtp_host(&self) -> String {
        match self.mail_service.trim().to_ascii_lowercase().as_str() {
            "gmail" | "googlemail" => "smtp.gmail.com".to_string(),
            "outlook" | "hotmail" | "outlook365" => "smtp-mail.outlook.com".to_string(),
            "yahoo" => "smtp.mail.yahoo.com".to_string(),
            "icloud" => "smtp.mail.me.com".to_string(),
            _ => self.mail_service.trim().to_string(),
        }
    }
}

/// Backdrop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub effect: EffectSelection,
    /// Delay between frames.
    pub frame_interval_ms: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            effect: EffectSelection::All,
            frame_interval_ms: 33,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides
    /// other than `PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override settings from environment-style variables.
    ///
    /// Empty values are ignored so an unset-but-exported variable does not
    /// clobber the file. `PORT` is left to [`RelayConfig::apply_port_env`]
    /// since only the relay listens on it.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(&lookup, key);

        if let Some(service) = get("EMAIL_SERVICE") {
            self.relay.mail_service = service;
        }
        if let Some(user) = get("EMAIL_USER") {
            self.relay.mail_user = Some(user);
        }
        if let Some(password) = get("EMAIL_PASSWORD") {
            self.relay.mail_password = Some(password);
        }
        if let Some(host) = get("FOLIO_HOST") {
            self.relay.host = host;
        }
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Path of `config.toml` in the platform config directory.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "folio", "folio").map(|dirs| dirs.config_dir().join("config.toml"))
}
