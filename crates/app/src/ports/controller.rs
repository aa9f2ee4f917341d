//! Controller port: the HTTP contract of the microcontroller hosting the devices.

use std::future::Future;
use std::sync::Arc;

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::error::{ConnectionError, DeviceControlError};
use smartspace_domain::id::VenueId;

/// Client for the controller's `/ping` and `/device` endpoints.
///
/// Both operations take the address as typed by the user and sanitise it
/// themselves. Implementations never retry; retry policy belongs to callers.
pub trait DeviceController {
    /// Succeeds only when the controller answers `pong`.
    fn check_liveness(
        &self,
        ip: &str,
        port: &str,
    ) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Send `command` to the device called `device_name` in `venue_id`.
    ///
    /// Fails with [`DeviceControlError::NotConnected`] without touching the
    /// network when `ip` or `port` is empty. Returns the controller's JSON
    /// answer, which is opaque to the caller.
    fn send_device_command(
        &self,
        ip: &str,
        port: &str,
        venue_id: &VenueId,
        device_name: &str,
        command: DeviceCommand,
    ) -> impl Future<Output = Result<serde_json::Value, DeviceControlError>> + Send;
}

impl<T: DeviceController + Send + Sync> DeviceController for Arc<T> {
    fn check_liveness(
        &self,
        ip: &str,
        port: &str,
    ) -> impl Future<Output = Result<(), ConnectionError>> + Send {
        (**self).check_liveness(ip, port)
    }

    fn send_device_command(
        &self,
        ip: &str,
        port: &str,
        venue_id: &VenueId,
        device_name: &str,
        command: DeviceCommand,
    ) -> impl Future<Output = Result<serde_json::Value, DeviceControlError>> + Send {
        (**self).send_device_command(ip, port, venue_id, device_name, command)
    }
}
