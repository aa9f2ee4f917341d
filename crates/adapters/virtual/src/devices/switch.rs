//! Virtual switch: accepts `state` commands.

use std::sync::{Mutex, PoisonError};

use smartspace_domain::device::{Device, DeviceControl, PowerState};
use smartspace_domain::id::{DeviceId, VenueId};

/// A simulated on/off device.
pub struct VirtualSwitch {
    device_id: DeviceId,
    venue_id: VenueId,
    name: String,
    state: Mutex<PowerState>,
}

impl VirtualSwitch {
    /// Create a switch that starts off.
    pub fn new(venue_id: VenueId, name: impl Into<String>) -> Self {
        Self {
            device_id: DeviceId::new(),
            venue_id,
            name: name.into(),
            state: Mutex::new(PowerState::Off),
        }
    }

    /// Current state as a [`Device`].
    #[must_use]
    pub fn snapshot(&self) -> Device {
        let state = *self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Device {
            id: self.device_id,
            venue_id: self.venue_id.clone(),
            name: self.name.clone(),
            control: DeviceControl::Normal { state },
        }
    }

    /// Switch to `next` and return the updated snapshot.
    pub fn set(&self, next: PowerState) -> Device {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.snapshot()
    }
}
