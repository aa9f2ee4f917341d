//! Per-device command gate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use smartspace_domain::id::DeviceId;

/// Serialises command issuance per device.
///
/// Each device gets its own async mutex: a second command for the same device
/// waits until the first one (and its revert, if any) is done, while other
/// devices proceed independently. Clones share the same set of locks.
#[derive(Debug, Clone, Default)]
pub struct CommandGate {
    locks: Arc<Mutex<HashMap<DeviceId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl CommandGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive command rights on `device_id`.
    ///
    /// The rights are released when the returned guard is dropped.
    pub async fn acquire(&self, device_id: DeviceId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(device_id).or_default())
        };
        lock.lock_owned().await
    }
}
