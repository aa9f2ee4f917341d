//! Device store port: the local copy of device state.
//!
//! Mutations are synchronous: an optimistic write is visible to every reader
//! before the remote call it precedes is even issued.

use std::sync::Arc;

use smartspace_domain::device::{Device, DevicePatch};
use smartspace_domain::error::SmartSpaceError;
use smartspace_domain::id::{DeviceId, VenueId};

/// Local registry of devices, grouped by venue.
pub trait DeviceStore {
    /// Add a device, replacing any device with the same id.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backing implementation.
    fn insert(&self, device: Device) -> Result<Device, SmartSpaceError>;

    /// Look up a device in a venue.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backing implementation.
    fn get(&self, venue_id: &VenueId, device_id: DeviceId)
    -> Result<Option<Device>, SmartSpaceError>;

    /// All devices of a venue, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backing implementation.
    fn list(&self, venue_id: &VenueId) -> Result<Vec<Device>, SmartSpaceError>;

    /// Remove a device. Removing an unknown device is not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backing implementation.
    fn remove(&self, venue_id: &VenueId, device_id: DeviceId) -> Result<(), SmartSpaceError>;

    /// Apply a partial update to the local copy of a device.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] for an unknown device and
    /// [`SmartSpaceError::Validation`] when the patch does not fit its kind.
    fn update_local(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
        patch: DevicePatch,
    ) -> Result<Device, SmartSpaceError>;
}

impl<T: DeviceStore> DeviceStore for Arc<T> {
    fn insert(&self, device: Device) -> Result<Device, SmartSpaceError> {
        (**self).insert(device)
    }

    fn get(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
    ) -> Result<Option<Device>, SmartSpaceError> {
        (**self).get(venue_id, device_id)
    }

    fn list(&self, venue_id: &VenueId) -> Result<Vec<Device>, SmartSpaceError> {
        (**self).list(venue_id)
    }

    fn remove(&self, venue_id: &VenueId, device_id: DeviceId) -> Result<(), SmartSpaceError> {
        (**self).remove(venue_id, device_id)
    }

    fn update_local(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
        patch: DevicePatch,
    ) -> Result<Device, SmartSpaceError> {
        (**self).update_local(venue_id, device_id, patch)
    }
}
