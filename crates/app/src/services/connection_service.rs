//! Connection service: checking and saving the controller address.

use smartspace_domain::connection::ConnectionConfig;
use smartspace_domain::error::{SmartSpaceError, ValidationError};
use smartspace_domain::notification::Severity;
use smartspace_domain::time::now;

use crate::ports::{ConfigProvider, DeviceController, Notifier};

/// Application service owning the controller address.
pub struct ConnectionService<C, P, N> {
    controller: C,
    config: P,
    notifier: N,
}

impl<C, P, N> ConnectionService<C, P, N>
where
    C: DeviceController,
    P: ConfigProvider,
    N: Notifier,
{
    /// Create a new service from its ports.
    pub fn new(controller: C, config: P, notifier: N) -> Self {
        Self {
            controller,
            config,
            notifier,
        }
    }

    /// Build the sanitised address, rejecting empty input.
    fn address(&self, ip: &str, port: &str) -> Result<ConnectionConfig, SmartSpaceError> {
        let config = self.config.snapshot().with_address(ip, port);
        if !config.is_configured() {
            self.notifier
                .notify("Please enter IP and Port", Severity::Error);
            return Err(ValidationError::MissingAddress.into());
        }
        Ok(config)
    }

    /// Ping the controller and remember the address if it answers.
    ///
    /// On success the sanitised address is stored as online. On failure the
    /// previous address is kept and marked offline.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] when ip or port is empty,
    /// [`SmartSpaceError::Connection`] when the controller does not answer
    /// `pong`, or a storage error from the config provider.
    #[tracing::instrument(skip(self))]
    pub async fn check_connection(
        &self,
        ip: &str,
        port: &str,
    ) -> Result<ConnectionConfig, SmartSpaceError> {
        let mut candidate = self.address(ip, port)?;

        match self
            .controller
            .check_liveness(&candidate.ip, &candidate.port)
            .await
        {
            Ok(()) => {
                candidate.mark_online(now());
                self.config.set(candidate.clone())?;
                tracing::info!(ip = %candidate.ip, port = %candidate.port, "controller online");
                self.notifier
                    .notify("Connection successful!", Severity::Success);
                Ok(candidate)
            }
            Err(err) => {
                tracing::warn!(error = %err, "controller check failed");
                let mut previous = self.config.snapshot();
                previous.mark_offline();
                self.config.set(previous)?;
                self.notifier
                    .notify(&format!("Connection failed: {err}"), Severity::Error);
                Err(err.into())
            }
        }
    }

    /// Store the address without checking it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] when ip or port is empty, or a
    /// storage error from the config provider.
    #[tracing::instrument(skip(self))]
    pub fn save(&self, ip: &str, port: &str) -> Result<ConnectionConfig, SmartSpaceError> {
        let config = self.address(ip, port)?;
        self.config.set(config.clone())?;
        self.notifier
            .notify("Configuration saved", Severity::Success);
        Ok(config)
    }
}
