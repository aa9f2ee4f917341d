//! # smartspace-adapter-virtual
//!
//! Virtual controller that simulates the devices of one or more venues, so
//! the whole stack can be exercised without hardware.
//!
//! ## Provided devices
//!
//! | Device | Kind | Accepts |
//! |--------|------|---------|
//! | Virtual Switch | `NORMAL` | `state=on` / `state=off` |
//! | Virtual Dimmer | `REGULATABLE` | `value=0..100` |
//!
//! The controller also implements the `DeviceController` port directly, for
//! in-process use where no HTTP hop is wanted.
//!
//! ## Dependency rule
//!
//! Depends on `smartspace-app` (port traits) and `smartspace-domain` only.

mod devices;

use std::collections::HashMap;

use smartspace_app::ports::DeviceController;
use smartspace_domain::command::DeviceCommand;
use smartspace_domain::device::{Device, DeviceKind};
use smartspace_domain::error::{
    ConnectionError, DeviceControlError, NotFoundError, SmartSpaceError, ValidationError,
};
use smartspace_domain::id::VenueId;

use devices::{VirtualDevice, VirtualDimmer, VirtualSwitch};

/// Simulated controller holding named devices per venue.
#[derive(Default)]
pub struct VirtualController {
    devices: HashMap<(VenueId, String), VirtualDevice>,
}

impl VirtualController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a simulated device, replacing any device with the same name in the
    /// venue. Switches start off, dimmers start at 0.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] when the name is blank.
    pub fn add(
        &mut self,
        venue_id: &VenueId,
        name: &str,
        kind: DeviceKind,
    ) -> Result<Device, SmartSpaceError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let device = match kind {
            DeviceKind::Normal => VirtualDevice::Switch(VirtualSwitch::new(venue_id.clone(), name)),
            DeviceKind::Regulatable => {
                VirtualDevice::Dimmer(VirtualDimmer::new(venue_id.clone(), name))
            }
        };
        let snapshot = device.snapshot();
        self.devices.insert((venue_id.clone(), name.to_string()), device);
        Ok(snapshot)
    }

    /// Snapshot of every simulated device, ordered by name.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.values().map(VirtualDevice::snapshot).collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }

    /// Snapshot of one device.
    #[must_use]
    pub fn get(&self, venue_id: &VenueId, name: &str) -> Option<Device> {
        self.devices
            .get(&(venue_id.clone(), name.to_string()))
            .map(VirtualDevice::snapshot)
    }

    /// Apply a command to the named device.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] for an unknown device and
    /// [`SmartSpaceError::Validation`] when the command does not fit its kind.
    pub fn apply(
        &self,
        venue_id: &VenueId,
        name: &str,
        command: DeviceCommand,
    ) -> Result<Device, SmartSpaceError> {
        let device = self
            .devices
            .get(&(venue_id.clone(), name.to_string()))
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: name.to_string(),
            })?;
        let snapshot = device.handle(command)?;
        tracing::info!(%venue_id, device_name = name, %command, "virtual device updated");
        Ok(snapshot)
    }
}

impl DeviceController for VirtualController {
    async fn check_liveness(&self, _ip: &str, _port: &str) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn send_device_command(
        &self,
        ip: &str,
        port: &str,
        venue_id: &VenueId,
        device_name: &str,
        command: DeviceCommand,
    ) -> Result<serde_json::Value, DeviceControlError> {
        if ip.is_empty() || port.is_empty() {
            return Err(DeviceControlError::NotConnected);
        }
        let device = self
            .apply(venue_id, device_name, command)
            .map_err(|err| match err {
                SmartSpaceError::NotFound(_) => DeviceControlError::Status {
                    status: 404,
                    reason: "Not Found".to_string(),
                },
                _ => DeviceControlError::Status {
                    status: 400,
                    reason: "Bad Request".to_string(),
                },
            })?;
        serde_json::to_value(device).map_err(|err| DeviceControlError::InvalidBody(err.to_string()))
    }
}
