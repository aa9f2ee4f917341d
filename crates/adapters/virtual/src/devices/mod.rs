//! Virtual device implementations: switch and dimmer.
//!
//! Each virtual device keeps a fixed [`DeviceId`](smartspace_domain::id::DeviceId)
//! for the lifetime of the controller.

mod dimmer;
mod switch;

pub use dimmer::VirtualDimmer;
pub use switch::VirtualSwitch;

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::device::{Device, DeviceKind};
use smartspace_domain::error::ValidationError;

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Switch(VirtualSwitch),
    Dimmer(VirtualDimmer),
}

impl VirtualDevice {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Switch(_) => DeviceKind::Normal,
            Self::Dimmer(_) => DeviceKind::Regulatable,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Device {
        match self {
            Self::Switch(d) => d.snapshot(),
            Self::Dimmer(d) => d.snapshot(),
        }
    }

    /// Apply a command, returning the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ControlMismatch`] when the command targets the
    /// other kind of device.
    pub fn handle(&self, command: DeviceCommand) -> Result<Device, ValidationError> {
        match (self, command) {
            (Self::Switch(d), DeviceCommand::SetState(state)) => Ok(d.set(state)),
            (Self::Dimmer(d), DeviceCommand::SetValue(level)) => Ok(d.set(level)),
            (device, command) => Err(ValidationError::ControlMismatch {
                expected: device.kind(),
                actual: command.patch().kind(),
            }),
        }
    }
}
