//! Configuration management for the terminal.
//!
//! The app config is a small TOML file with two sections:
//!
//! ```toml
//! [terminal]
//! boot_address = "10.14.8.10.14.7.10.safenet"
//! network_dir = "config/network"
//! software_file = "config/software.json"
//! operator = "Anhangá"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Game *data* (server manifests, user directories, mailboxes, the software
//! registry) is JSON under `network_dir`/`software_file` and is handled by
//! [`crate::net`] and [`crate::kernel::registry`]; this module only covers
//! how the application itself is wired.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Core terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Address the kernel connects to on boot and after `logout`/`sair`.
    pub boot_address: String,
    /// Directory holding one subdirectory per connectable address.
    #[serde(default = "default_network_dir")]
    pub network_dir: String,
    /// JSON mapping of command name to software descriptor (or null).
    #[serde(default = "default_software_file")]
    pub software_file: String,
    /// Name of the terminal's operator, shown by `quemsoueu`.
    #[serde(default = "default_operator")]
    pub operator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

fn default_network_dir() -> String {
    "config/network".to_string()
}

fn default_software_file() -> String {
    "config/software.json".to_string()
}

fn default_operator() -> String {
    "Anhangá".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file {path}"))?;
        let config: Config =
            toml::from_str(&raw).with_context(|| format!("parsing config file {path}"))?;
        Ok(config)
    }

    /// Write a default configuration file, refusing to clobber an existing one.
    pub async fn create_default(path: &str) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            anyhow::bail!("config file {path} already exists");
        }
        let config = Config {
            terminal: TerminalConfig {
                boot_address: "10.14.8.10.14.7.10.safenet".to_string(),
                network_dir: default_network_dir(),
                software_file: default_software_file(),
                operator: default_operator(),
            },
            logging: LoggingConfig::default(),
        };
        let raw = toml::to_string_pretty(&config)?;
        fs::write(path, raw)
            .await
            .with_context(|| format!("writing config file {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_applies_section_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("terminal.toml");
        std::fs::write(
            &path,
            "[terminal]\nboot_address = \"home.safenet\"\n",
        )
        .unwrap();
        let config = Config::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.terminal.boot_address, "home.safenet");
        assert_eq!(config.terminal.network_dir, "config/network");
        assert_eq!(config.terminal.operator, "Anhangá");
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn create_default_round_trips_and_refuses_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("terminal.toml");
        let path = path.to_str().unwrap().to_string();
        let created = Config::create_default(&path).await.unwrap();
        let loaded = Config::load(&path).await.unwrap();
        assert_eq!(created.terminal.boot_address, loaded.terminal.boot_address);
        assert!(Config::create_default(&path).await.is_err());
    }
}
