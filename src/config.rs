//! Runtime configuration.
//!
//! Defaults cover the public deployment. An optional YAML file overrides
//! any subset of keys, and CLI flags/environment variables override that.
//!
//! ```yaml
//! fetch_timeout_secs: 20
//! server:
//!   port: 8080
//!   allowed_origins:
//!     - https://agromitra.vercel.app
//!   rate_limit:
//!     window_secs: 900
//!     max_requests: 100
//! ```

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::error::{AppError, Result};
use crate::scrapers::krishijagran::{BASE_ORIGIN, HOMEPAGE_URL};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page fetched by `/api/news` and `scrape`.
    pub source_url: String,
    /// Origin relative links are resolved against.
    pub base_origin: String,
    /// Outbound fetch timeout.
    pub fetch_timeout_secs: u64,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
}

/// At most `max_requests` per client per `window_secs` on `/api`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: HOMEPAGE_URL.to_string(),
            base_origin: BASE_ORIGIN.to_string(),
            fetch_timeout_secs: 30,
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            allowed_origins: vec![
                "https://agromitra.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
            ],
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

impl RateLimitConfig {
    /// Seconds between replenishing one request of quota.
    pub fn replenish_every_secs(&self) -> u64 {
        (self.window_secs / u64::from(self.max_requests.max(1))).max(1)
    }
}

impl AppConfig {
    /// Load from `path` if given, otherwise use defaults.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).await?;
                let config = Self::from_yaml(&raw)?;
                info!(path, "Loaded configuration");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Add a deployment-specific frontend origin to the CORS allow-list.
    pub fn allow_origin(&mut self, origin: &str) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !self.server.allowed_origins.iter().any(|o| o == origin) {
            self.server.allowed_origins.push(origin.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.source_url)?;
        let base = Url::parse(&self.base_origin)?;
        if self.base_origin.ends_with('/') {
            return Err(AppError::config(format!(
                "base_origin must not end with '/': {base}"
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(AppError::config("fetch_timeout_secs must be positive"));
        }
        let limit = &self.server.rate_limit;
        if limit.window_secs == 0 || limit.max_requests == 0 {
            return Err(AppError::config(
                "rate_limit window_secs and max_requests must be positive",
            ));
        }
        Ok(())
    }
}
