//! In-memory implementations of the config and device store ports.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use smartspace_domain::connection::ConnectionConfig;
use smartspace_domain::device::{Device, DevicePatch};
use smartspace_domain::error::{NotFoundError, SmartSpaceError};
use smartspace_domain::id::{DeviceId, VenueId};

use crate::ports::{ConfigProvider, DeviceStore};

/// [`ConfigProvider`] that keeps the config in memory only.
#[derive(Debug, Default)]
pub struct InMemoryConfigProvider {
    config: RwLock<ConnectionConfig>,
}

impl InMemoryConfigProvider {
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn snapshot(&self) -> ConnectionConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, config: ConnectionConfig) -> Result<(), SmartSpaceError> {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

/// [`DeviceStore`] backed by a `HashMap` keyed by device id.
#[derive(Debug, Default)]
pub struct InMemoryDeviceStore {
    devices: Mutex<HashMap<DeviceId, Device>>,
}

impl InMemoryDeviceStore {
    /// Create a store pre-filled with `devices`.
    #[must_use]
    pub fn with(devices: impl IntoIterator<Item = Device>) -> Self {
        Self {
            devices: Mutex::new(devices.into_iter().map(|d| (d.id, d)).collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DeviceId, Device>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(device_id: DeviceId) -> SmartSpaceError {
    NotFoundError {
        entity: "Device",
        id: device_id.to_string(),
    }
    .into()
}

impl DeviceStore for InMemoryDeviceStore {
    fn insert(&self, device: Device) -> Result<Device, SmartSpaceError> {
        self.lock().insert(device.id, device.clone());
        Ok(device)
    }

    fn get(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
    ) -> Result<Option<Device>, SmartSpaceError> {
        Ok(self
            .lock()
            .get(&device_id)
            .filter(|d| &d.venue_id == venue_id)
            .cloned())
    }

    fn list(&self, venue_id: &VenueId) -> Result<Vec<Device>, SmartSpaceError> {
        let mut devices: Vec<Device> = self
            .lock()
            .values()
            .filter(|d| &d.venue_id == venue_id)
            .cloned()
            .collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    fn remove(&self, venue_id: &VenueId, device_id: DeviceId) -> Result<(), SmartSpaceError> {
        let mut devices = self.lock();
        if devices.get(&device_id).is_some_and(|d| &d.venue_id == venue_id) {
            devices.remove(&device_id);
        }
        Ok(())
    }

    fn update_local(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
        patch: DevicePatch,
    ) -> Result<Device, SmartSpaceError> {
        let mut devices = self.lock();
        let device = devices
            .get_mut(&device_id)
            .filter(|d| &d.venue_id == venue_id)
            .ok_or_else(|| not_found(device_id))?;
        device.apply(patch)?;
        Ok(device.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartspace_domain::device::{Level, PowerState};
    use smartspace_domain::error::ValidationError;

    fn venue(name: &str) -> VenueId {
        VenueId::new(name).unwrap()
    }

    fn switch(venue_id: &VenueId, name: &str) -> Device {
        Device::builder()
            .venue_id(venue_id.clone())
            .name(name)
            .build()
            .unwrap()
    }

    #[test]
    fn should_return_default_config_when_empty() {
        let provider = InMemoryConfigProvider::default();
        assert!(!provider.snapshot().is_configured());
    }

    #[test]
    fn should_replace_config_on_set() {
        let provider = InMemoryConfigProvider::default();
        provider
            .set(ConnectionConfig::new("10.0.0.2", "80"))
            .unwrap();
        assert_eq!(provider.snapshot().ip, "10.0.0.2");
    }

    #[test]
    fn should_scope_lookups_by_venue() {
        let home = venue("home");
        let device = switch(&home, "lamp");
        let store = InMemoryDeviceStore::with([device.clone()]);

        assert_eq!(store.get(&home, device.id).unwrap(), Some(device.clone()));
        assert_eq!(store.get(&venue("office"), device.id).unwrap(), None);
    }

    #[test]
    fn should_list_devices_of_venue_sorted_by_name() {
        let home = venue("home");
        let store = InMemoryDeviceStore::with([
            switch(&home, "porch"),
            switch(&home, "desk"),
            switch(&venue("office"), "garage"),
        ]);

        let names: Vec<String> = store
            .list(&home)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["desk", "porch"]);
    }

    #[test]
    fn should_apply_patch_in_place() {
        let home = venue("home");
        let device = switch(&home, "lamp");
        let store = InMemoryDeviceStore::with([device.clone()]);

        let updated = store
            .update_local(&home, device.id, DevicePatch::State(PowerState::On))
            .unwrap();
        assert_eq!(updated.state(), Some(PowerState::On));
        assert_eq!(
            store.get(&home, device.id).unwrap().unwrap().state(),
            Some(PowerState::On)
        );
    }

    #[test]
    fn should_return_not_found_when_patching_unknown_device() {
        let store = InMemoryDeviceStore::default();
        let result = store.update_local(
            &venue("office"),
            DeviceId::new(),
            DevicePatch::Value(Level::MAX),
        );
        assert!(matches!(result, Err(SmartSpaceError::NotFound(_))));
    }

    #[test]
    fn should_reject_mismatched_patch() {
        let home = venue("home");
        let device = switch(&home, "lamp");
        let store = InMemoryDeviceStore::with([device.clone()]);

        let result = store.update_local(&home, device.id, DevicePatch::Value(Level::MAX));
        assert!(matches!(
            result,
            Err(SmartSpaceError::Validation(
                ValidationError::ControlMismatch { .. }
            ))
        ));
    }

    #[test]
    fn should_ignore_remove_from_other_venue() {
        let home = venue("home");
        let device = switch(&home, "lamp");
        let store = InMemoryDeviceStore::with([device.clone()]);

        store.remove(&venue("office"), device.id).unwrap();
        assert!(store.get(&home, device.id).unwrap().is_some());

        store.remove(&home, device.id).unwrap();
        assert!(store.get(&home, device.id).unwrap().is_none());
    }
}
