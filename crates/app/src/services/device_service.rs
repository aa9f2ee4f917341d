//! Device service: use-cases for managing the local device registry.

use smartspace_domain::device::{Device, DeviceKind};
use smartspace_domain::error::{NotFoundError, SmartSpaceError};
use smartspace_domain::id::{DeviceId, VenueId};

use crate::ports::DeviceStore;

/// Application service for device registry operations.
pub struct DeviceService<S> {
    store: S,
}

fn not_found(device_id: DeviceId) -> NotFoundError {
    NotFoundError {
        entity: "Device",
        id: device_id.to_string(),
    }
}

impl<S: DeviceStore> DeviceService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a device in a venue, starting off (`NORMAL`) or at level 0
    /// (`REGULATABLE`).
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] if the name is blank, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self))]
    pub fn add_device(
        &self,
        venue_id: &VenueId,
        name: &str,
        kind: DeviceKind,
    ) -> Result<Device, SmartSpaceError> {
        let device = Device::builder()
            .venue_id(venue_id.clone())
            .name(name)
            .kind(kind)
            .build()?;
        self.store.insert(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] when the venue has no device with
    /// `device_id`, or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub fn get_device(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
    ) -> Result<Device, SmartSpaceError> {
        self.store
            .get(venue_id, device_id)?
            .ok_or_else(|| not_found(device_id).into())
    }

    /// List the devices of a venue, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub fn list_devices(&self, venue_id: &VenueId) -> Result<Vec<Device>, SmartSpaceError> {
        self.store.list(venue_id)
    }

    /// Delete a device.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] when the venue has no device with
    /// `device_id`, or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub fn delete_device(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
    ) -> Result<(), SmartSpaceError> {
        if self.store.get(venue_id, device_id)?.is_none() {
            return Err(not_found(device_id).into());
        }
        self.store.remove(venue_id, device_id)
    }
}
