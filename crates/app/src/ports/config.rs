//! Config port: where the controller address is kept between calls.

use std::sync::Arc;

use smartspace_domain::connection::ConnectionConfig;
use smartspace_domain::error::SmartSpaceError;

/// Holds the current [`ConnectionConfig`].
///
/// Readers get an owned snapshot, so a config update never tears a call
/// that is already in progress.
pub trait ConfigProvider {
    /// Current config.
    fn snapshot(&self) -> ConnectionConfig;

    /// Replace the config.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Storage`] when a persistent provider fails
    /// to write.
    fn set(&self, config: ConnectionConfig) -> Result<(), SmartSpaceError>;
}

impl<T: ConfigProvider> ConfigProvider for Arc<T> {
    fn snapshot(&self) -> ConnectionConfig {
        (**self).snapshot()
    }

    fn set(&self, config: ConnectionConfig) -> Result<(), SmartSpaceError> {
        (**self).set(config)
    }
}
