//! Toggle protocol for `NORMAL` devices.

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::device::{DeviceKind, DevicePatch, PowerState};
use smartspace_domain::error::{NotFoundError, SmartSpaceError, ValidationError};
use smartspace_domain::id::{DeviceId, VenueId};
use smartspace_domain::notification::Severity;

use crate::ports::{ConfigProvider, DeviceController, DeviceStore, Notifier};
use crate::sync::SyncContext;

/// Optimistic on/off switching with revert on failure.
pub struct ToggleController<C, S, N, P> {
    ctx: SyncContext<C, S, N, P>,
}

impl<C, S, N, P> ToggleController<C, S, N, P>
where
    C: DeviceController + Send + Sync,
    S: DeviceStore,
    N: Notifier,
    P: ConfigProvider,
{
    pub fn new(ctx: SyncContext<C, S, N, P>) -> Self {
        Self { ctx }
    }

    /// Flip a `NORMAL` device.
    ///
    /// The inverted state is written to the local store before the command is
    /// sent. If the controller refuses, the store goes back to exactly the
    /// previous state and an error notification is emitted. Toggles of the
    /// same device run one after the other, each starting from the state the
    /// previous one left behind.
    ///
    /// Returns the new, confirmed state.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] for an unknown device,
    /// [`SmartSpaceError::Validation`] for a `REGULATABLE` device (nothing is
    /// changed or sent), and [`SmartSpaceError::DeviceControl`] when the
    /// controller call fails. The control error is returned even when the
    /// revert itself fails.
    #[tracing::instrument(skip(self), fields(%venue_id, %device_id))]
    pub async fn toggle(
        &self,
        venue_id: &VenueId,
        device_id: DeviceId,
    ) -> Result<PowerState, SmartSpaceError> {
        let _permit = self.ctx.gate.acquire(device_id).await;

        let device = self
            .ctx
            .store
            .get(venue_id, device_id)?
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            })?;
        let Some(previous) = device.state() else {
            return Err(ValidationError::ControlMismatch {
                expected: DeviceKind::Normal,
                actual: device.kind(),
            }
            .into());
        };
        let next = previous.inverse();

        self.ctx
            .store
            .update_local(venue_id, device_id, DevicePatch::State(next))?;

        match self
            .ctx
            .send(venue_id, &device.name, DeviceCommand::SetState(next))
            .await
        {
            Ok(_) => {
                tracing::debug!(device_name = %device.name, state = %next, "toggle confirmed");
                Ok(next)
            }
            Err(err) => {
                tracing::warn!(
                    device_name = %device.name,
                    error = %err,
                    reverted_to = %previous,
                    "toggle failed, reverting local state"
                );
                self.ctx
                    .notifier
                    .notify(&format!("Failed to toggle: {err}"), Severity::Error);
                let reverted = self
                    .ctx
                    .store
                    .update_local(venue_id, device_id, DevicePatch::State(previous));
                if let Err(revert) = reverted {
                    tracing::error!(
                        device_name = %device.name,
                        error = %revert,
                        "unable to revert local state"
                    );
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use smartspace_domain::connection::ConnectionConfig;
    use smartspace_domain::device::{Device, Level};
    use smartspace_domain::error::DeviceControlError;
    use tokio::sync::oneshot;

    use crate::memory::{InMemoryConfigProvider, InMemoryDeviceStore};
    use crate::sync::testing::{RecordingNotifier, Reply, ScriptedController};

    struct Fixture {
        toggle: Arc<
            ToggleController<
                ScriptedController,
                InMemoryDeviceStore,
                RecordingNotifier,
                InMemoryConfigProvider,
            >,
        >,
        controller: Arc<ScriptedController>,
        store: Arc<InMemoryDeviceStore>,
        notifier: Arc<RecordingNotifier>,
        device: Device,
    }

    fn fixture(initial: PowerState, replies: Vec<Reply>) -> Fixture {
        let device = Device::builder()
            .venue_id(VenueId::new("home").unwrap())
            .name("desk lamp")
            .switch(initial)
            .build()
            .unwrap();
        let controller = Arc::new(ScriptedController::replying(replies));
        let store = Arc::new(InMemoryDeviceStore::with([device.clone()]));
        let notifier = Arc::new(RecordingNotifier::default());
        let config = Arc::new(InMemoryConfigProvider::new(ConnectionConfig::new(
            "10.0.0.5", "80",
        )));
        let ctx = SyncContext::new(
            Arc::clone(&controller),
            Arc::clone(&store),
            Arc::clone(&notifier),
            config,
        );
        Fixture {
            toggle: Arc::new(ToggleController::new(ctx)),
            controller,
            store,
            notifier,
            device,
        }
    }

    fn local_state(f: &Fixture) -> Option<PowerState> {
        f.store
            .get(&f.device.venue_id, f.device.id)
            .unwrap()
            .unwrap()
            .state()
    }

    #[tokio::test]
    async fn should_switch_on_and_send_state_when_off() {
        let f = fixture(PowerState::Off, vec![Reply::Ok]);

        let state = f.toggle.toggle(&f.device.venue_id, f.device.id).await.unwrap();

        assert_eq!(state, PowerState::On);
        assert_eq!(local_state(&f), Some(PowerState::On));
        assert_eq!(
            f.controller.sent(),
            [(
                "desk lamp".to_string(),
                DeviceCommand::SetState(PowerState::On)
            )]
        );
        assert!(f.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn should_write_optimistically_then_revert_on_failure() {
        let (tx, rx) = oneshot::channel();
        let f = fixture(PowerState::Off, vec![Reply::Hold(rx)]);

        let toggle = Arc::clone(&f.toggle);
        let (venue_id, device_id) = (f.device.venue_id.clone(), f.device.id);
        let task = tokio::spawn(async move { toggle.toggle(&venue_id, device_id).await });

        while f.controller.sent().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(local_state(&f), Some(PowerState::On));

        tx.send(Err(DeviceControlError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }))
        .unwrap();
        let result = task.await.unwrap();

        assert!(matches!(result, Err(SmartSpaceError::DeviceControl(_))));
        assert_eq!(local_state(&f), Some(PowerState::Off));
        assert_eq!(
            f.notifier.messages(),
            [(
                "Failed to toggle: device control failed: 500 Internal Server Error".to_string(),
                Severity::Error
            )]
        );
    }

    #[tokio::test]
    async fn should_revert_to_on_when_switching_off_fails() {
        let f = fixture(
            PowerState::On,
            vec![Reply::Fail(DeviceControlError::Timeout)],
        );

        let result = f.toggle.toggle(&f.device.venue_id, f.device.id).await;

        assert!(matches!(
            result,
            Err(SmartSpaceError::DeviceControl(DeviceControlError::Timeout))
        ));
        assert_eq!(local_state(&f), Some(PowerState::On));
    }

    #[tokio::test]
    async fn should_revert_when_not_connected() {
        let f = fixture(PowerState::Off, vec![]);
        let ctx = SyncContext::new(
            Arc::clone(&f.controller),
            Arc::clone(&f.store),
            Arc::clone(&f.notifier),
            Arc::new(InMemoryConfigProvider::default()),
        );
        let toggle = ToggleController::new(ctx);

        let result = toggle.toggle(&f.device.venue_id, f.device.id).await;

        assert!(matches!(
            result,
            Err(SmartSpaceError::DeviceControl(DeviceControlError::NotConnected))
        ));
        assert_eq!(local_state(&f), Some(PowerState::Off));
        assert!(f.controller.sent().is_empty());
    }

    #[tokio::test]
    async fn should_serialize_toggles_of_same_device() {
        let (tx, rx) = oneshot::channel();
        let f = fixture(PowerState::Off, vec![Reply::Hold(rx), Reply::Ok]);
        let device_id = f.device.id;

        let first = {
            let toggle = Arc::clone(&f.toggle);
            let venue_id = f.device.venue_id.clone();
            tokio::spawn(async move { toggle.toggle(&venue_id, device_id).await })
        };
        while f.controller.sent().is_empty() {
            tokio::task::yield_now().await;
        }
        let second = {
            let toggle = Arc::clone(&f.toggle);
            let venue_id = f.device.venue_id.clone();
            tokio::spawn(async move { toggle.toggle(&venue_id, device_id).await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(f.controller.sent().len(), 1, "second toggle must wait");

        tx.send(Err(DeviceControlError::Timeout)).unwrap();
        assert!(first.await.unwrap().is_err());
        assert_eq!(second.await.unwrap().unwrap(), PowerState::On);

        let sent: Vec<DeviceCommand> = f.controller.sent().into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            sent,
            [
                DeviceCommand::SetState(PowerState::On),
                DeviceCommand::SetState(PowerState::On)
            ]
        );
        assert_eq!(local_state(&f), Some(PowerState::On));
    }

    /// Store whose updates start failing after the first one.
    struct FailingAfterFirstUpdate {
        inner: InMemoryDeviceStore,
        updates: AtomicUsize,
    }

    impl DeviceStore for FailingAfterFirstUpdate {
        fn insert(&self, device: Device) -> Result<Device, SmartSpaceError> {
            self.inner.insert(device)
        }

        fn get(
            &self,
            venue_id: &VenueId,
            device_id: DeviceId,
        ) -> Result<Option<Device>, SmartSpaceError> {
            self.inner.get(venue_id, device_id)
        }

        fn list(&self, venue_id: &VenueId) -> Result<Vec<Device>, SmartSpaceError> {
            self.inner.list(venue_id)
        }

        fn remove(&self, venue_id: &VenueId, device_id: DeviceId) -> Result<(), SmartSpaceError> {
            self.inner.remove(venue_id, device_id)
        }

        fn update_local(
            &self,
            venue_id: &VenueId,
            device_id: DeviceId,
            patch: DevicePatch,
        ) -> Result<Device, SmartSpaceError> {
            if self.updates.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(SmartSpaceError::Storage("disk full".into()));
            }
            self.inner.update_local(venue_id, device_id, patch)
        }
    }

    #[tokio::test]
    async fn should_notify_and_keep_control_error_when_revert_fails() {
        let f = fixture(PowerState::Off, vec![]);
        let store = Arc::new(FailingAfterFirstUpdate {
            inner: InMemoryDeviceStore::with([f.device.clone()]),
            updates: AtomicUsize::new(0),
        });
        let controller = Arc::new(ScriptedController::replying([Reply::Fail(
            DeviceControlError::Timeout,
        )]));
        let ctx = SyncContext::new(
            controller,
            store,
            Arc::clone(&f.notifier),
            Arc::new(InMemoryConfigProvider::new(ConnectionConfig::new(
                "10.0.0.5", "80",
            ))),
        );

        let result = ToggleController::new(ctx)
            .toggle(&f.device.venue_id, f.device.id)
            .await;

        assert!(matches!(
            result,
            Err(SmartSpaceError::DeviceControl(DeviceControlError::Timeout))
        ));
        assert_eq!(
            f.notifier.messages(),
            [(
                "Failed to toggle: request timed out".to_string(),
                Severity::Error
            )]
        );
    }

    #[tokio::test]
    async fn should_reject_regulatable_device_without_sending() {
        let f = fixture(PowerState::Off, vec![]);
        let dimmer = Device::builder()
            .venue_id(f.device.venue_id.clone())
            .name("ceiling")
            .dimmer(Level::new(40).unwrap())
            .build()
            .unwrap();
        f.store.insert(dimmer.clone()).unwrap();

        let result = f.toggle.toggle(&dimmer.venue_id, dimmer.id).await;

        assert!(matches!(
            result,
            Err(SmartSpaceError::Validation(
                ValidationError::ControlMismatch { .. }
            ))
        ));
        assert!(f.controller.sent().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let f = fixture(PowerState::Off, vec![]);
        let result = f.toggle.toggle(&f.device.venue_id, DeviceId::new()).await;
        assert!(matches!(result, Err(SmartSpaceError::NotFound(_))));
    }
}
