//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream weather API configuration.
    pub weather: WeatherApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the National Weather Service API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    /// Base URL of the API, without trailing slash.
    pub base_url: String,

    /// `User-Agent` sent with every request. NWS requires one.
    pub user_agent: String,

    /// Deadline for each upstream request, in seconds.
    pub timeout_secs: u64,
}

impl WeatherApiConfig {
    /// Per-request deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.weather.gov".to_string(),
            user_agent: "weather-app/1.0".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            weather: WeatherApiConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_NWS_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("MCP_NWS_BASE_URL") {
            config.weather.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(user_agent) = std::env::var("MCP_NWS_USER_AGENT") {
            config.weather.user_agent = user_agent;
        }

        if let Ok(timeout) = std::env::var("MCP_NWS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.weather.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_NWS_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.weather.timeout_secs
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_weather_env() {
        unsafe {
            std::env::remove_var("MCP_NWS_BASE_URL");
            std::env::remove_var("MCP_NWS_USER_AGENT");
            std::env::remove_var("MCP_NWS_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_weather_defaults() {
        let config = Config::default();
        assert_eq!(config.weather.base_url, "https://api.weather.gov");
        assert_eq!(config.weather.user_agent, "weather-app/1.0");
        assert_eq!(config.weather.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_weather_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_NWS_BASE_URL", "http://localhost:1234/");
            std::env::set_var("MCP_NWS_USER_AGENT", "test-agent/2.0");
            std::env::set_var("MCP_NWS_TIMEOUT_SECS", "3");
        }
        let config = Config::from_env();
        assert_eq!(config.weather.base_url, "http://localhost:1234");
        assert_eq!(config.weather.user_agent, "test-agent/2.0");
        assert_eq!(config.weather.timeout_secs, 3);
        clear_weather_env();
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_weather_env();
        unsafe {
            std::env::set_var("MCP_NWS_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.weather.timeout_secs, 10);

        unsafe {
            std::env::set_var("MCP_NWS_TIMEOUT_SECS", "0");
        }
        let config = Config::from_env();
        assert_eq!(config.weather.timeout_secs, 10);
        clear_weather_env();
    }

    #[test]
    fn test_server_name_default() {
        let config = Config::new();
        assert_eq!(config.server.name, "weather");
        assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
    }
}
