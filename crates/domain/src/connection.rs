//! Connection to the controller: address sanitisation and the stored config.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Strip leading `http://` / `https://` schemes and trailing slashes.
///
/// Idempotent: `sanitize_host(&sanitize_host(x)) == sanitize_host(x)`.
#[must_use]
pub fn sanitize_host(raw: &str) -> String {
    let mut host = raw;
    while let Some(rest) = host
        .strip_prefix("http://")
        .or_else(|| host.strip_prefix("https://"))
    {
        host = rest;
    }
    host.trim_end_matches('/').to_string()
}

/// Keep only the ASCII digits of a port.
#[must_use]
pub fn sanitize_port(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Where the controller lives and what we last knew about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Hostname or IP, without scheme or trailing slash.
    pub ip: String,
    /// Digits only. Kept as text since it comes straight from user input.
    pub port: String,
    pub is_online: bool,
    pub last_checked_at: Option<Timestamp>,
}

impl ConnectionConfig {
    /// Build a config from raw user input, sanitising both parts.
    #[must_use]
    pub fn new(ip: &str, port: &str) -> Self {
        Self {
            ip: sanitize_host(ip),
            port: sanitize_port(port),
            is_online: false,
            last_checked_at: None,
        }
    }

    /// Whether both ip and port are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.ip.is_empty() && !self.port.is_empty()
    }

    /// Same config with a new address, keeping the liveness fields.
    #[must_use]
    pub fn with_address(&self, ip: &str, port: &str) -> Self {
        Self {
            ip: sanitize_host(ip),
            port: sanitize_port(port),
            ..self.clone()
        }
    }

    /// Mark the controller reachable as of `at`.
    pub fn mark_online(&mut self, at: Timestamp) {
        self.is_online = true;
        self.last_checked_at = Some(at);
    }

    /// Mark the controller unreachable, keeping the last successful check time.
    pub fn mark_offline(&mut self) {
        self.is_online = false;
    }
}

/// `http://{ip}:{port}{path}` for an already sanitised address.
#[must_use]
pub fn endpoint(ip: &str, port: &str, path: &str) -> String {
    format!("http://{ip}:{port}{path}")
}
