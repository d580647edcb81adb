// src/config.rs

//! # Configuration
//!
//! Settings come from an optional YAML file (path in `HEALTH_BOT_CONFIG`,
//! default `config.yaml`) and are then overridden by `HEALTH_BOT_*`
//! environment variables. Every field has a default.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env, io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::services::reply_templates::ReplyTemplate;

pub const CONFIG_PATH_VAR: &str = "HEALTH_BOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEV_JWT_SECRET: &str = "sih-health-bot-dev-secret";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: env!("CARGO_PKG_NAME").to_string(),
            access_ttl_secs: 5 * 60,
            refresh_ttl_secs: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub knowledge_path: PathBuf,
    pub cors_origins: Vec<String>,
    pub auth: AuthConfig,
    /// Extra or replacement reply templates keyed by language code.
    pub templates: HashMap<String, ReplyTemplate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            knowledge_path: PathBuf::from("data/health_data.json"),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            auth: AuthConfig::default(),
            templates: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config file (if present) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var(CONFIG_PATH_VAR).ok();
        let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            info!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|var| env::var(var).ok())?;
        config.ensure_secret();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to null, which should mean "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies `HEALTH_BOT_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HEALTH_BOT_HOST") {
            self.host = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "HEALTH_BOT_HOST",
                value,
            })?;
        }
        if let Some(value) = lookup("HEALTH_BOT_PORT") {
            self.port = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "HEALTH_BOT_PORT",
                value,
            })?;
        }
        if let Some(value) = lookup("HEALTH_BOT_KNOWLEDGE_PATH") {
            self.knowledge_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("HEALTH_BOT_JWT_SECRET") {
            self.auth.jwt_secret = value;
        }
        if let Some(value) = lookup("HEALTH_BOT_CORS_ORIGINS") {
            self.cors_origins = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Substitutes the development secret when none is configured.
    pub fn ensure_secret(&mut self) {
        if self.auth.jwt_secret.is_empty() {
            warn!("No JWT secret configured, using the development secret; set HEALTH_BOT_JWT_SECRET");
            self.auth.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
