//! # smartspace-app
//!
//! Application layer: use-cases, **port definitions** (traits) and the
//! optimistic sync controllers.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceController`: liveness check and device commands over the wire
//!   - `DeviceStore`: local copy of device state
//!   - `ConfigProvider`: where the controller lives
//!   - `Notifier`: user-visible success and error messages
//! - Define **driving/inbound** use-cases:
//!   - `ConnectionService`: check and save the controller address
//!   - `DeviceService`: add, list, get, delete devices
//!   - `ToggleController` / `SliderController`: optimistic device control
//! - Provide **in-process infrastructure** that doesn't need IO (notification
//!   bus, in-memory store and config)
//!
//! ## Dependency rule
//! Depends on `smartspace-domain` only (plus `tokio` for channels, locks and
//! timers). Never imports adapter crates. Adapters depend on *this* crate, not
//! the reverse.

pub mod memory;
pub mod notification_bus;
pub mod ports;
pub mod services;
pub mod sync;
