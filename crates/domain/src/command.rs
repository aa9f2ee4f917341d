//! Device command: the wire parameters of a mutation sent to the controller.

use crate::device::{DevicePatch, Level, PowerState};

/// A mutation the controller understands: `state=<on|off>` or `value=<0-100>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    SetState(PowerState),
    SetValue(Level),
}

impl DeviceCommand {
    /// Query parameters appended after `venue` and `name`.
    #[must_use]
    pub fn params(&self) -> [(&'static str, String); 1] {
        match self {
            Self::SetState(state) => [("state", state.to_string())],
            Self::SetValue(level) => [("value", level.to_string())],
        }
    }

    /// The local patch matching this command once it is confirmed.
    #[must_use]
    pub fn patch(&self) -> DevicePatch {
        match *self {
            Self::SetState(state) => DevicePatch::State(state),
            Self::SetValue(level) => DevicePatch::Value(level),
        }
    }
}

impl std::fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetState(state) => write!(f, "state={state}"),
            Self::SetValue(level) => write!(f, "value={level}"),
        }
    }
}
