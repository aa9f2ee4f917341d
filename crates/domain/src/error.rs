//! Common error types used across the workspace.
//!
//! Each failure family has its own typed error; [`SmartSpaceError`] wraps them
//! all via `#[from]` so services can propagate with `?`.

use crate::device::DeviceKind;

/// Umbrella error returned by application services and sync controllers.
#[derive(Debug, thiserror::Error)]
pub enum SmartSpaceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    DeviceControl(#[from] DeviceControlError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("venue must not be empty")]
    EmptyVenue,

    #[error("level {0} is outside 0..=100")]
    LevelOutOfRange(i64),

    #[error("invalid level {0:?}")]
    InvalidLevel(String),

    #[error("expected a {expected} device, got a {actual} device")]
    ControlMismatch {
        expected: DeviceKind,
        actual: DeviceKind,
    },

    #[error("ip and port are required")]
    MissingAddress,
}

/// A lookup did not match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure of a controller liveness check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The controller answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// The controller answered, but not with `pong`.
    #[error("unexpected response: {0:?}")]
    UnexpectedResponse(String),

    #[error("{0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid controller address: {0}")]
    InvalidAddress(String),
}

/// Failure of a device command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceControlError {
    /// No ip or port configured; nothing was sent.
    #[error("controller not connected")]
    NotConnected,

    #[error("device control failed: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid controller address: {0}")]
    InvalidAddress(String),

    /// The controller answered with a body that is not JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}
