//! Configuration for ConveyorJog
//!
//! Read-only application configuration, organised into sections:
//! - Connection preferences (preferred port, port filtering, timeouts)
//! - Keyboard bindings for the four jog directions
//! - Logging level
//!
//! The baud rate is part of the protocol and is deliberately absent.
//! Configuration is loaded from JSON or TOML and is never written back.

use conveyorjog_core::{Axis, Direction, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted port I/O timeout
pub const MAX_TIMEOUT_MS: u64 = 1000;

/// Connection preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Port to select after a refresh; empty means the first listed port
    pub port: String,
    /// Only list USB/ACM/COM style devices
    pub usb_only: bool,
    /// Port write timeout in milliseconds
    pub write_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            usb_only: false,
            write_timeout_ms: 20,
        }
    }
}

impl ConnectionSettings {
    /// Preferred port, if one is configured
    pub fn preferred_port(&self) -> Option<&str> {
        let port = self.port.trim();
        (!port.is_empty()).then_some(port)
    }
}

/// Key names bound to jog directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub x_negative: String,
    pub x_positive: String,
    pub y_positive: String,
    pub y_negative: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            x_negative: "Left".to_string(),
            x_positive: "Right".to_string(),
            y_positive: "Up".to_string(),
            y_negative: "Down".to_string(),
        }
    }
}

impl KeyBindings {
    fn entries(&self) -> [(&str, Axis, Direction); 4] {
        [
            (self.x_negative.as_str(), Axis::X, Direction::Negative),
            (self.x_positive.as_str(), Axis::X, Direction::Positive),
            (self.y_positive.as_str(), Axis::Y, Direction::Positive),
            (self.y_negative.as_str(), Axis::Y, Direction::Negative),
        ]
    }

    /// Jog direction bound to `key`, compared case-insensitively
    pub fn resolve(&self, key: &str) -> Option<(Axis, Direction)> {
        let key = key.trim();
        self.entries()
            .into_iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, axis, direction)| (axis, direction))
    }

    /// Key bound to a jog direction
    pub fn key_for(&self, axis: Axis, direction: Direction) -> &str {
        self.entries()
            .into_iter()
            .find(|(_, a, d)| *a == axis && *d == direction)
            .map(|(name, _, _)| name)
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let entries = self.entries();
        for (i, (name, axis, direction)) in entries.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::config(format!(
                    "No key bound to {} {:?}",
                    axis, direction
                )));
            }
            if entries[..i]
                .iter()
                .any(|(other, _, _)| other.trim().eq_ignore_ascii_case(name.trim()))
            {
                return Err(Error::config(format!("Key '{}' is bound twice", name)));
            }
        }
        Ok(())
    }
}

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Keyboard bindings
    pub keys: KeyBindings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config_dir>/conveyorjog/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("conveyorjog").join("config.toml"))
    }

    /// Load the default config file, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let timeout = self.connection.write_timeout_ms;
        if timeout == 0 || timeout > MAX_TIMEOUT_MS {
            return Err(Error::config(format!(
                "Write timeout must be between 1 and {}ms, got {}",
                MAX_TIMEOUT_MS, timeout
            )));
        }

        self.keys.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err(Error::config("Log level must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connection.write_timeout_ms, 20);
        assert_eq!(config.connection.preferred_port(), None);
    }

    #[test]
    fn test_resolve_keys() {
        let keys = KeyBindings::default();
        assert_eq!(keys.resolve("left"), Some((Axis::X, Direction::Negative)));
        assert_eq!(keys.resolve("Right"), Some((Axis::X, Direction::Positive)));
        assert_eq!(keys.resolve(" UP "), Some((Axis::Y, Direction::Positive)));
        assert_eq!(keys.resolve("Down"), Some((Axis::Y, Direction::Negative)));
        assert_eq!(keys.resolve("Space"), None);
        assert_eq!(keys.key_for(Axis::Y, Direction::Negative), "Down");
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mut config = Config::default();
        config.keys.y_positive = "left".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bound twice"));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.connection.write_timeout_ms = 0;
        assert!(config.validate().is_err());
        config.connection.write_timeout_ms = MAX_TIMEOUT_MS + 1;
        assert!(config.validate().is_err());
        config.connection.write_timeout_ms = MAX_TIMEOUT_MS;
        assert!(config.validate().is_ok());
    }
}
