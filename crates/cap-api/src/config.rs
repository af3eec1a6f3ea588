//! Plugin configuration
//!
//! Layered settings: built-in defaults, an optional TOML file, then
//! `CAP_`-prefixed environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use cap_apic::ApicConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 45020,
        }
    }
}

/// Top-level plugin settings.
///
/// `fabrics` seeds the read-only fabric lookup table; fabric management
/// itself stays with the aggregator.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub apic: ApicConfig,
    #[serde(default)]
    pub fabrics: Vec<String>,
}

impl PluginConfig {
    /// Load settings from the optional file at `path` plus environment
    /// overrides such as `CAP_APIC__URL`.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(Environment::with_prefix("CAP").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_settings() {
        let settings: PluginConfig = serde_json::from_value(serde_json::json!({
            "server": {"host": "0.0.0.0", "port": 8080},
            "apic": {
                "url": "https://apic.example.net",
                "username": "admin",
                "password": "secret"
            },
            "fabrics": ["f1", "f2"]
        }))
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.apic.timeout_secs, 30);
        assert_eq!(settings.fabrics, vec!["f1".to_string(), "f2".to_string()]);
    }

    #[test]
    fn server_section_defaults_when_omitted() {
        let settings: PluginConfig = serde_json::from_value(serde_json::json!({
            "apic": {
                "url": "https://apic.example.net",
                "username": "admin",
                "password": "secret"
            }
        }))
        .unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 45020);
        assert!(settings.fabrics.is_empty());
    }
}
