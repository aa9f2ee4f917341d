//! Optimistic sync between local device state and the controller.
//!
//! Two protocols share a [`SyncContext`]:
//!
//! - [`ToggleController`] for `NORMAL` devices: write the inverted state
//!   locally, send it, and put the previous state back if the controller
//!   refuses.
//! - [`SliderController`] for `REGULATABLE` devices: track every raw input as
//!   a draft, debounce it, send the settled value if it differs from the last
//!   confirmed one, and leave the draft alone on failure.
//!
//! Command issuance is serialised per device through a [`CommandGate`].

pub mod debounce;
pub mod gate;
pub mod slider;
pub mod toggle;

pub use debounce::Debouncer;
pub use gate::CommandGate;
pub use slider::SliderController;
pub use toggle::ToggleController;

use std::sync::Arc;
use std::time::Duration;

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::error::DeviceControlError;
use smartspace_domain::id::VenueId;

use crate::ports::{ConfigProvider, DeviceController};

/// Quiet period before a slider value is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Dependencies shared by every sync controller.
///
/// Cheap to clone; all clones share the same ports and command gate.
pub struct SyncContext<C, S, N, P> {
    controller: Arc<C>,
    store: Arc<S>,
    notifier: Arc<N>,
    config: Arc<P>,
    gate: CommandGate,
}

impl<C, S, N, P> Clone for SyncContext<C, S, N, P> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            config: Arc::clone(&self.config),
            gate: self.gate.clone(),
        }
    }
}

impl<C, S, N, P> SyncContext<C, S, N, P> {
    /// Create a new context from shared port implementations.
    pub fn new(controller: Arc<C>, store: Arc<S>, notifier: Arc<N>, config: Arc<P>) -> Self {
        Self {
            controller,
            store,
            notifier,
            config,
            gate: CommandGate::new(),
        }
    }

    /// The local device store the controllers write to.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<C, S, N, P> SyncContext<C, S, N, P>
where
    C: DeviceController + Send + Sync,
    P: ConfigProvider,
{
    /// Send `command` using a fresh snapshot of the connection config.
    async fn send(
        &self,
        venue_id: &VenueId,
        device_name: &str,
        command: DeviceCommand,
    ) -> Result<serde_json::Value, DeviceControlError> {
        let config = self.config.snapshot();
        self.controller
            .send_device_command(&config.ip, &config.port, venue_id, device_name, command)
            .await
    }
}
