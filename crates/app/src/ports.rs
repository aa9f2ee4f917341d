//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod config;
pub mod controller;
pub mod device_store;
pub mod notifier;

pub use config::ConfigProvider;
pub use controller::DeviceController;
pub use device_store::DeviceStore;
pub use notifier::Notifier;
