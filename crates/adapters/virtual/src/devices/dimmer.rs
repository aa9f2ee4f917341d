//! Virtual dimmer: accepts `value` commands.

use std::sync::{Mutex, PoisonError};

use smartspace_domain::device::{Device, DeviceControl, Level};
use smartspace_domain::id::{DeviceId, VenueId};

/// A simulated device with a level in `0..=100`.
pub struct VirtualDimmer {
    device_id: DeviceId,
    venue_id: VenueId,
    name: String,
    value: Mutex<Level>,
}

impl VirtualDimmer {
    /// Create a dimmer at level 0.
    pub fn new(venue_id: VenueId, name: impl Into<String>) -> Self {
        Self {
            device_id: DeviceId::new(),
            venue_id,
            name: name.into(),
            value: Mutex::new(Level::MIN),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Device {
        let value = *self.value.lock().unwrap_or_else(PoisonError::into_inner);
        Device {
            id: self.device_id,
            venue_id: self.venue_id.clone(),
            name: self.name.clone(),
            control: DeviceControl::Regulatable { value },
        }
    }

    /// Move to `level` and return the updated snapshot.
    pub fn set(&self, level: Level) -> Device {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = level;
        self.snapshot()
    }
}
