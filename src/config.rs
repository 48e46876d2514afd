//! Configuration types for kalshi-gateway
//!
//! Everything except credentials comes from a TOML file. Credentials are read
//! from the environment (see [`crate::auth::Credentials::from_env`]).

use crate::market::KALSHI_API_URL;
use crate::telemetry::LogFormat;
use anyhow::Context;
use serde::Deserialize;

/// Bundled example configuration, used when no config file is found
pub const EXAMPLE_CONFIG: &str = include_str!("../config.toml.example");

/// Shortest `Cache-Control: max-age` allowed on relayed GETs
pub const MIN_CACHE_AGE_SECS: u32 = 10;
/// Longest `Cache-Control: max-age` allowed on relayed GETs
pub const MAX_CACHE_AGE_SECS: u32 = 30;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Inbound HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path prefix proxied to the upstream API
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// `max-age` for relayed GET responses (10..=30)
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u32,

    /// Forward GETs unsigned when no credentials are configured
    #[serde(default = "default_true")]
    pub allow_unauthenticated_reads: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_mount_path() -> String {
    "/api/kalshi".to_string()
}
fn default_cache_max_age() -> u32 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            mount_path: default_mount_path(),
            cache_max_age_secs: default_cache_max_age(),
            allow_unauthenticated_reads: true,
        }
    }
}

/// Upstream trade API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL including the API path prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout; unset means no client-side timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    KALSHI_API_URL.to_string()
}
fn default_user_agent() -> String {
    concat!("kalshi-gateway/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; exporter disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the proxy cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        let cache_age = self.server.cache_max_age_secs;
        if !(MIN_CACHE_AGE_SECS..=MAX_CACHE_AGE_SECS).contains(&cache_age) {
            anyhow::bail!(
                "server.cache_max_age_secs must be within {}..={}, got {}",
                MIN_CACHE_AGE_SECS,
                MAX_CACHE_AGE_SECS,
                cache_age
            );
        }

        let mount = self.server.mount_path.trim_end_matches('/');
        if !mount.starts_with('/') || mount.is_empty() {
            anyhow::bail!("server.mount_path must start with '/' and not be the root");
        }
        if mount == "/api" || mount == "/health" || mount.starts_with("/api/markets") {
            anyhow::bail!("server.mount_path {} collides with a built-in route", mount);
        }

        reqwest::Url::parse(&self.upstream.base_url)
            .with_context(|| format!("upstream.base_url {} is not a URL", self.upstream.base_url))?;

        Ok(())
    }
}
