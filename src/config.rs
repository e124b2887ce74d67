//! Node configuration
//!
//! Broker endpoint and session identity for the kitchen node.
//! Values come from an optional JSON file next to the binary; a missing
//! file means defaults, a malformed one is a hard error so a typo never
//! silently falls back to localhost.

use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Broker and session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Broker ---
    /// Broker hostname or IP.
    pub broker_host: String,
    /// Broker TCP port.
    pub broker_port: u16,

    // --- Session ---
    /// Client identity presented at connect time.
    pub client_id: String,
    /// Broker username; empty means anonymous.
    pub username: String,
    /// Broker password; empty means anonymous.
    pub password: String,
    /// MQTT keep-alive interval (seconds).
    pub keep_alive_secs: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Broker
            broker_host: "localhost".into(),
            broker_port: 1883,

            // Session
            client_id: "ESP32Client".into(),
            username: String::new(),
            password: String::new(),
            keep_alive_secs: 30, // well above the 10 s cycle
        }
    }
}

impl NodeConfig {
    /// Load from `path`, falling back to defaults when the file does not
    /// exist.  Any other read or parse failure propagates.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config: Self =
                    serde_json::from_str(&text).map_err(ConfigError::Malformed)?;
                config.validate()?;
                info!("configuration loaded from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Unreadable(e)),
        }
    }

    /// Reject values the node cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker_host.is_empty() {
            return Err(ConfigError::Invalid("broker_host must not be empty"));
        }
        if self.broker_port == 0 {
            return Err(ConfigError::Invalid("broker_port must not be zero"));
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::Invalid("client_id must not be empty"));
        }
        if self.keep_alive_secs == 0 {
            return Err(ConfigError::Invalid("keep_alive_secs must not be zero"));
        }
        Ok(())
    }
}

/// Why a configuration could not be used.
#[derive(Debug)]
pub enum ConfigError {
    /// File exists but could not be read.
    Unreadable(std::io::Error),
    /// File read but is not valid JSON for [`NodeConfig`].
    Malformed(serde_json::Error),
    /// Parsed fine but a value is unusable.
    Invalid(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unreadable(e) => write!(f, "configuration unreadable: {e}"),
            Self::Malformed(e) => write!(f, "configuration malformed: {e}"),
            Self::Invalid(why) => write!(f, "configuration invalid: {why}"),
        }
    }
}

impl std::error::Error for ConfigError {}
