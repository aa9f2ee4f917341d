//! Debounced slider protocol for `REGULATABLE` devices.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::Notify;

use smartspace_domain::command::DeviceCommand;
use smartspace_domain::device::{DeviceKind, DevicePatch, Level};
use smartspace_domain::error::{
    DeviceControlError, NotFoundError, SmartSpaceError, ValidationError,
};
use smartspace_domain::id::{DeviceId, VenueId};
use smartspace_domain::notification::Severity;

use crate::ports::{ConfigProvider, DeviceController, DeviceStore, Notifier};
use crate::sync::{Debouncer, SyncContext};

#[derive(Debug)]
struct SliderState {
    /// Last value the controller accepted (or reported).
    confirmed: Level,
    /// Latest raw input, shown to the user right away.
    draft: Level,
    /// Dispatches spawned and not finished yet.
    in_flight: usize,
    /// Value of the most recent dispatch. What `confirmed` becomes if every
    /// dispatch in flight succeeds.
    last_dispatched: Level,
    /// A debounce timer is running for the current draft.
    armed: bool,
    /// Bumped on every input so a stale timer can tell it lost the race.
    generation: u64,
    last_error: Option<DeviceControlError>,
}

impl SliderState {
    fn is_idle(&self) -> bool {
        !self.armed && self.in_flight == 0
    }
}

struct Inner<C, S, N, P> {
    ctx: SyncContext<C, S, N, P>,
    venue_id: VenueId,
    device_id: DeviceId,
    device_name: String,
    state: Mutex<SliderState>,
    debouncer: Debouncer,
    idle: Notify,
}

impl<C, S, N, P> Inner<C, S, N, P> {
    fn lock(&self) -> MutexGuard<'_, SliderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Slider bound to one `REGULATABLE` device.
///
/// Raw inputs land in the draft immediately. Once the draft has been quiet for
/// the debounce delay it is sent, unless it already equals the value the
/// controller holds once pending sends land. A failed send keeps the draft
/// where the user left it.
///
/// Cheap to clone; clones drive the same slider.
pub struct SliderController<C, S, N, P> {
    inner: Arc<Inner<C, S, N, P>>,
}

impl<C, S, N, P> Clone for SliderController<C, S, N, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S, N, P> SliderController<C, S, N, P>
where
    C: DeviceController + Send + Sync + 'static,
    S: DeviceStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    P: ConfigProvider + Send + Sync + 'static,
{
    /// Bind a slider to a device, starting from its stored level.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::NotFound`] for an unknown device and
    /// [`SmartSpaceError::Validation`] for a `NORMAL` device.
    pub fn bind(
        ctx: SyncContext<C, S, N, P>,
        venue_id: &VenueId,
        device_id: DeviceId,
        delay: Duration,
    ) -> Result<Self, SmartSpaceError> {
        let device = ctx
            .store
            .get(venue_id, device_id)?
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            })?;
        let Some(value) = device.value() else {
            return Err(ValidationError::ControlMismatch {
                expected: DeviceKind::Regulatable,
                actual: device.kind(),
            }
            .into());
        };

        Ok(Self {
            inner: Arc::new(Inner {
                ctx,
                venue_id: venue_id.clone(),
                device_id,
                device_name: device.name,
                state: Mutex::new(SliderState {
                    confirmed: value,
                    draft: value,
                    in_flight: 0,
                    last_dispatched: value,
                    armed: false,
                    generation: 0,
                    last_error: None,
                }),
                debouncer: Debouncer::new(delay),
                idle: Notify::new(),
            }),
        })
    }

    /// Feed a raw input and restart the debounce window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&self, level: Level) {
        let generation = {
            let mut state = self.inner.lock();
            state.draft = level;
            state.armed = true;
            state.generation += 1;
            state.generation
        };
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .debouncer
            .schedule(move || fire(&weak, generation));
    }

    /// Apply a value reported by the controller outside this slider.
    ///
    /// The draft follows only when no local edit is pending or in flight.
    pub fn observe_remote(&self, level: Level) {
        let mut state = self.inner.lock();
        state.confirmed = level;
        if state.is_idle() {
            state.draft = level;
        }
    }

    /// Wait until no debounce timer is armed and no command is in flight.
    pub async fn settle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}

impl<C, S, N, P> SliderController<C, S, N, P> {
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.inner.device_id
    }

    /// Value the user currently sees.
    #[must_use]
    pub fn draft(&self) -> Level {
        self.inner.lock().draft
    }

    /// Last value the controller accepted.
    #[must_use]
    pub fn confirmed(&self) -> Level {
        self.inner.lock().confirmed
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.lock().is_idle()
    }

    /// Error of the most recent send, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<DeviceControlError> {
        self.inner.lock().last_error.clone()
    }
}

/// Debounce callback: turn the settled draft into a dispatch.
fn fire<C, S, N, P>(weak: &Weak<Inner<C, S, N, P>>, generation: u64)
where
    C: DeviceController + Send + Sync + 'static,
    S: DeviceStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    P: ConfigProvider + Send + Sync + 'static,
{
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let candidate = {
        let mut state = inner.lock();
        if state.generation != generation {
            return;
        }
        state.armed = false;
        let baseline = if state.in_flight > 0 {
            state.last_dispatched
        } else {
            state.confirmed
        };
        if state.draft == baseline {
            None
        } else {
            state.in_flight += 1;
            state.last_dispatched = state.draft;
            Some(state.draft)
        }
    };
    match candidate {
        Some(candidate) => {
            tokio::spawn(dispatch(inner, candidate));
        }
        None => {
            tracing::debug!(
                device_name = %inner.device_name,
                "draft equals pending value, nothing to send"
            );
            inner.idle.notify_waiters();
        }
    }
}

async fn dispatch<C, S, N, P>(inner: Arc<Inner<C, S, N, P>>, candidate: Level)
where
    C: DeviceController + Send + Sync,
    S: DeviceStore,
    N: Notifier,
    P: ConfigProvider,
{
    let permit = inner.ctx.gate.acquire(inner.device_id).await;

    // An earlier dispatch may have confirmed this value while we waited.
    let already_confirmed = inner.lock().confirmed == candidate;
    if !already_confirmed {
        let result = inner
            .ctx
            .send(
                &inner.venue_id,
                &inner.device_name,
                DeviceCommand::SetValue(candidate),
            )
            .await;
        match result {
            Ok(_) => {
                {
                    let mut state = inner.lock();
                    state.confirmed = candidate;
                    state.last_error = None;
                }
                if let Err(err) = inner.ctx.store.update_local(
                    &inner.venue_id,
                    inner.device_id,
                    DevicePatch::Value(candidate),
                ) {
                    tracing::warn!(
                        device_name = %inner.device_name,
                        error = %err,
                        "unable to store confirmed value"
                    );
                }
                tracing::debug!(
                    device_name = %inner.device_name,
                    value = %candidate,
                    "value confirmed"
                );
            }
            Err(err) => {
                tracing::warn!(
                    device_name = %inner.device_name,
                    value = %candidate,
                    error = %err,
                    "set value failed, keeping draft"
                );
                inner
                    .ctx
                    .notifier
                    .notify(&format!("Failed to set value: {err}"), Severity::Error);
                inner.lock().last_error = Some(err);
            }
        }
    }
    drop(permit);

    inner.lock().in_flight -= 1;
    inner.idle.notify_waiters();
}
