//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `smartspace.toml` in the working directory unless another path
//! is given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use smartspace_domain::device::DeviceKind;
use smartspace_domain::id::VenueId;

/// Default config file name.
pub const DEFAULT_PATH: &str = "smartspace.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the controller lives, when no session has been saved yet.
    pub controller: ControllerConfig,
    /// Slider debounce settings.
    pub sync: SyncConfig,
    /// Mock controller server.
    pub mock: MockConfig,
    /// Persisted connection session.
    pub session: SessionConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Controller client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub ip: String,
    pub port: String,
    /// Bound on every request, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period before a slider value is sent, in milliseconds.
    pub debounce_ms: u64,
}

/// Mock controller listener and the devices it simulates.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    pub devices: Vec<MockDevice>,
}

/// One simulated device.
#[derive(Debug, Clone, Deserialize)]
pub struct MockDevice {
    pub venue: VenueId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// TOML file holding the last saved connection.
    pub path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SMARTSPACE_CONTROLLER_IP") {
            self.controller.ip = val;
        }
        if let Ok(val) = std::env::var("SMARTSPACE_CONTROLLER_PORT") {
            self.controller.port = val;
        }
        if let Ok(val) = std::env::var("SMARTSPACE_MOCK_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.mock.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.mock.port = port;
            }
        }
        if let Ok(val) = std::env::var("SMARTSPACE_SESSION") {
            self.session.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SMARTSPACE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mock.port == 0 {
            return Err(ConfigError::Validation(
                "mock port must be non-zero".to_string(),
            ));
        }
        if self.controller.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "controller timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the mock server's `host:port` bind address.
    #[must_use]
    pub fn mock_bind_addr(&self) -> String {
        format!("{}:{}", self.mock.host, self.mock.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.controller.timeout_secs)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sync.debounce_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: String::new(),
            timeout_secs: 5,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            devices: Vec::new(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("smartspace-session.toml"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smartspace=info,smartspace_app=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.controller.timeout_secs, 5);
        assert_eq!(config.sync.debounce_ms, 300);
        assert_eq!(config.mock_bind_addr(), "127.0.0.1:3000");
        assert_eq!(
            config.session.path,
            PathBuf::from("smartspace-session.toml")
        );
        assert!(config.mock.devices.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mock.port, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [controller]
            ip = '192.168.1.100'
            port = '80'
            timeout_secs = 2

            [sync]
            debounce_ms = 150

            [mock]
            host = '0.0.0.0'
            port = 9090

            [[mock.devices]]
            venue = '67e55044-10b1-426f-9247-bb680e5fe0c8'
            name = 'desk lamp'
            type = 'NORMAL'

            [[mock.devices]]
            venue = 'living-room'
            name = 'ceiling'
            type = 'REGULATABLE'

            [session]
            path = '/tmp/session.toml'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.controller.ip, "192.168.1.100");
        assert_eq!(config.controller.port, "80");
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.mock_bind_addr(), "0.0.0.0:9090");
        assert_eq!(config.mock.devices.len(), 2);
        assert_eq!(config.mock.devices[0].kind, DeviceKind::Normal);
        assert_eq!(config.mock.devices[1].name, "ceiling");
        assert_eq!(config.mock.devices[1].venue.as_str(), "living-room");
        assert_eq!(config.session.path, PathBuf::from("/tmp/session.toml"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [mock]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mock.port, 8080);
        assert_eq!(config.mock.host, "127.0.0.1");
        assert_eq!(config.sync.debounce_ms, 300);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.mock.port, 3000);
    }

    #[test]
    fn should_reject_zero_mock_port() {
        let mut config = Config::default();
        config.mock.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeout() {
        let mut config = Config::default();
        config.controller.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_unknown_device_type() {
        let toml = "
            [[mock.devices]]
            venue = '67e55044-10b1-426f-9247-bb680e5fe0c8'
            name = 'fan'
            type = 'DIMMER'
        ";
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_blank_device_venue() {
        let toml = "
            [[mock.devices]]
            venue = ''
            name = 'fan'
            type = 'NORMAL'
        ";
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
