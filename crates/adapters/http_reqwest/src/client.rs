//! [`DeviceController`] implementation over `reqwest`.

use std::time::Duration;

use reqwest::Url;

use smartspace_app::ports::DeviceController;
use smartspace_domain::command::DeviceCommand;
use smartspace_domain::connection::{endpoint, sanitize_host, sanitize_port};
use smartspace_domain::error::{ConnectionError, DeviceControlError};
use smartspace_domain::id::VenueId;

use crate::error;

/// Default bound on every request to the controller.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Talks to the controller over plain HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestDeviceController {
    client: reqwest::Client,
}

impl Default for ReqwestDeviceController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestDeviceController {
    /// Create a client bounded by [`REQUEST_TIMEOUT`].
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialised.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Fail to build HTTP client.");
        Self { client }
    }
}

fn device_url(
    ip: &str,
    port: &str,
    venue_id: &VenueId,
    device_name: &str,
    command: DeviceCommand,
) -> Result<Url, DeviceControlError> {
    let mut url = Url::parse(&endpoint(ip, port, "/device"))
        .map_err(|err| DeviceControlError::InvalidAddress(err.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("venue", venue_id.as_str())
            .append_pair("name", device_name);
        for (key, value) in command.params() {
            query.append_pair(key, &value);
        }
    }
    Ok(url)
}

impl DeviceController for ReqwestDeviceController {
    #[tracing::instrument(skip(self))]
    async fn check_liveness(&self, ip: &str, port: &str) -> Result<(), ConnectionError> {
        let url = Url::parse(&endpoint(&sanitize_host(ip), &sanitize_port(port), "/ping"))
            .map_err(|err| ConnectionError::InvalidAddress(err.to_string()))?;
        tracing::debug!(%url, "checking controller");

        let response = self.client.get(url).send().await.map_err(|err| {
            tracing::warn!(error = %err, "ping failed");
            error::connection(&err)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "ping answered with an error status");
            return Err(ConnectionError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| error::connection(&err))?;
        if body.trim() == "pong" {
            Ok(())
        } else {
            tracing::warn!(body = %body, "ping answered with something else than pong");
            Err(ConnectionError::UnexpectedResponse(body))
        }
    }

    #[tracing::instrument(skip(self, command), fields(%command))]
    async fn send_device_command(
        &self,
        ip: &str,
        port: &str,
        venue_id: &VenueId,
        device_name: &str,
        command: DeviceCommand,
    ) -> Result<serde_json::Value, DeviceControlError> {
        let (ip, port) = (sanitize_host(ip), sanitize_port(port));
        if ip.is_empty() || port.is_empty() {
            return Err(DeviceControlError::NotConnected);
        }

        let url = device_url(&ip, &port, venue_id, device_name, command)?;
        tracing::debug!(%url, "sending device command");

        let response = self.client.get(url).send().await.map_err(|err| {
            tracing::warn!(error = %err, "device command failed");
            error::device_control(&err)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "device command refused");
            return Err(DeviceControlError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| error::device_control(&err))?;
        serde_json::from_str(&body).map_err(|err| DeviceControlError::InvalidBody(err.to_string()))
    }
}
