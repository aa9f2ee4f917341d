//! Mapping of `reqwest` failures onto the domain error kinds.

use smartspace_domain::error::{ConnectionError, DeviceControlError};

/// Classify a failed liveness request.
pub(crate) fn connection(err: &reqwest::Error) -> ConnectionError {
    if err.is_timeout() {
        ConnectionError::Timeout
    } else {
        ConnectionError::Transport(err.to_string())
    }
}

/// Classify a failed device request.
pub(crate) fn device_control(err: &reqwest::Error) -> DeviceControlError {
    if err.is_timeout() {
        DeviceControlError::Timeout
    } else {
        DeviceControlError::Transport(err.to_string())
    }
}
