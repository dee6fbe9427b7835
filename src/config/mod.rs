//! # Configuration Management Module
//!
//! TOML configuration for forgebot, organized into sections:
//!
//! - [`BotConfig`] - bot identity and command prefix
//! - [`StorageConfig`] - data directory for the persisted documents
//! - [`WebConfig`] - HTTP status endpoint
//! - [`LoggingConfig`] - log level and optional log file
//!
//! Values come from the config file with sensible defaults; the gateway
//! credential (`FORGEBOT_TOKEN`) and the status port (`PORT`) may be
//! supplied via environment variables, which take precedence.
//!
//! ```toml
//! [bot]
//! name = "forgebot"
//! command_prefix = "-"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [web]
//! enabled = true
//! port = 3000
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Prefixes the command parser will accept. Anything else falls back to
/// the default so ordinary chat text cannot become a command surface.
const ALLOWED_PREFIXES: [char; 6] = ['-', '!', '^', '+', '$', '>'];
const DEFAULT_PREFIX: char = '-';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot identity reported by the status endpoint and `status` command.
    pub name: String,
    /// Command prefix character. Must be one of a hard-coded allowed set;
    /// invalid values fall back to `-`.
    #[serde(default = "default_prefix_string")]
    pub command_prefix: String,
}

fn default_prefix_string() -> String {
    DEFAULT_PREFIX.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub enabled: bool,
    /// Listen port for the status endpoint; the `PORT` env var overrides.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Effective command prefix: the configured character when allowed,
    /// otherwise the default `-`.
    pub fn command_prefix(&self) -> char {
        let mut chars = self.bot.command_prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ALLOWED_PREFIXES.contains(&c) => c,
            _ => DEFAULT_PREFIX,
        }
    }

    /// Status-endpoint port, honoring the `PORT` env var override.
    pub fn web_port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.web.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                name: "forgebot".to_string(),
                command_prefix: default_prefix_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            web: WebConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_usable() {
        let config = Config::default();
        assert_eq!(config.command_prefix(), '-');
        assert_eq!(config.web.port, 3000);
        assert!(config.web.enabled);
        assert_eq!(config.storage.data_dir, "./data");
    }

    #[test]
    fn invalid_prefixes_fall_back_to_default() {
        for bad in ["", "--", "a", "강", " "] {
            let mut config = Config::default();
            config.bot.command_prefix = bad.to_string();
            assert_eq!(config.command_prefix(), '-', "prefix {bad:?}");
        }
        let mut config = Config::default();
        config.bot.command_prefix = "!".to_string();
        assert_eq!(config.command_prefix(), '!');
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.bot.name, config.bot.name);
        assert_eq!(parsed.web.port, config.web.port);
        assert_eq!(parsed.logging.level, config.logging.level);
    }

    #[test]
    fn missing_web_section_uses_defaults() {
        let toml_src = r#"
            [bot]
            name = "forgebot"

            [storage]
            data_dir = "./data"

            [logging]
            level = "info"
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert!(config.web.enabled);
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.command_prefix(), '-');
    }
}
