//! Device: a named light or switch hosted on the controller.
//!
//! The local [`DeviceId`] keys the device in the local store, while the
//! `name` is what the controller knows it by on the wire.

mod level;
mod power_state;

pub use level::Level;
pub use power_state::{PowerState, UnknownPowerState};

use serde::{Deserialize, Serialize};

use crate::error::{SmartSpaceError, ValidationError};
use crate::id::{DeviceId, VenueId};

/// How a device is controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceKind {
    /// Binary on/off.
    Normal,
    /// Continuous level in `0..=100`.
    Regulatable,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => f.write_str("NORMAL"),
            Self::Regulatable => f.write_str("REGULATABLE"),
        }
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(Self::Normal),
            "REGULATABLE" => Ok(Self::Regulatable),
            _ => Err(format!("unknown device type {s:?}")),
        }
    }
}

/// The active control of a device. Exactly one of `state` / `value` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceControl {
    Normal { state: PowerState },
    Regulatable { value: Level },
}

impl DeviceControl {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Normal { .. } => DeviceKind::Normal,
            Self::Regulatable { .. } => DeviceKind::Regulatable,
        }
    }

    /// Default control for a freshly added device of the given kind.
    #[must_use]
    pub fn initial(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Normal => Self::Normal {
                state: PowerState::Off,
            },
            DeviceKind::Regulatable => Self::Regulatable { value: Level::MIN },
        }
    }
}

/// Partial update applied to the local copy of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePatch {
    State(PowerState),
    Value(Level),
}

impl DevicePatch {
    /// Kind of device this patch can be applied to.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::State(_) => DeviceKind::Normal,
            Self::Value(_) => DeviceKind::Regulatable,
        }
    }
}

/// A controllable device in a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub venue_id: VenueId,
    pub name: String,
    #[serde(flatten)]
    pub control: DeviceControl,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.control.kind()
    }

    /// Current power state, for `NORMAL` devices.
    #[must_use]
    pub fn state(&self) -> Option<PowerState> {
        match self.control {
            DeviceControl::Normal { state } => Some(state),
            DeviceControl::Regulatable { .. } => None,
        }
    }

    /// Current level, for `REGULATABLE` devices.
    #[must_use]
    pub fn value(&self) -> Option<Level> {
        match self.control {
            DeviceControl::Regulatable { value } => Some(value),
            DeviceControl::Normal { .. } => None,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), SmartSpaceError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ControlMismatch`] when the patch targets the
    /// other kind of control; the device is left untouched.
    pub fn apply(&mut self, patch: DevicePatch) -> Result<(), ValidationError> {
        match (&mut self.control, patch) {
            (DeviceControl::Normal { state }, DevicePatch::State(next)) => *state = next,
            (DeviceControl::Regulatable { value }, DevicePatch::Value(next)) => *value = next,
            (control, patch) => {
                return Err(ValidationError::ControlMismatch {
                    expected: control.kind(),
                    actual: patch.kind(),
                });
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    venue_id: Option<VenueId>,
    name: Option<String>,
    control: Option<DeviceControl>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn venue_id(mut self, venue_id: VenueId) -> Self {
        self.venue_id = Some(venue_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Start as a `NORMAL` device with the given state.
    #[must_use]
    pub fn switch(mut self, state: PowerState) -> Self {
        self.control = Some(DeviceControl::Normal { state });
        self
    }

    /// Start as a `REGULATABLE` device with the given level.
    #[must_use]
    pub fn dimmer(mut self, value: Level) -> Self {
        self.control = Some(DeviceControl::Regulatable { value });
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.control = Some(DeviceControl::initial(kind));
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// Defaults to a `NORMAL` device that is off.
    ///
    /// # Errors
    ///
    /// Returns [`SmartSpaceError::Validation`] if the venue is missing or if
    /// `name` is missing or blank.
    pub fn build(self) -> Result<Device, SmartSpaceError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            venue_id: self.venue_id.ok_or(ValidationError::EmptyVenue)?,
            name: self.name.unwrap_or_default(),
            control: self
                .control
                .unwrap_or_else(|| DeviceControl::initial(DeviceKind::Normal)),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> VenueId {
        VenueId::new("home").unwrap()
    }

    #[test]
    fn should_require_venue() {
        let result = Device::builder().name("Desk lamp").build();
        assert!(matches!(
            result,
            Err(SmartSpaceError::Validation(ValidationError::EmptyVenue))
        ));
    }

    #[test]
    fn should_build_switch_that_is_off_by_default() {
        let device = Device::builder()
            .venue_id(venue())
            .name("Desk lamp")
            .build().unwrap();
        assert_eq!(device.kind(), DeviceKind::Normal);
        assert_eq!(device.state(), Some(PowerState::Off));
        assert_eq!(device.value(), None);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Device::builder().venue_id(venue()).name("   ").build();
        assert!(matches!(
            result,
            Err(SmartSpaceError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_apply_matching_patch() {
        let mut device = Device::builder()
            .venue_id(venue())
            .name("Ceiling")
            .dimmer(Level::new(40).unwrap())
            .build()
            .unwrap();
        device
            .apply(DevicePatch::Value(Level::new(70).unwrap()))
            .unwrap();
        assert_eq!(device.value(), Some(Level::new(70).unwrap()));
    }

    #[test]
    fn should_reject_patch_of_other_kind() {
        let mut device = Device::builder()
            .venue_id(venue())
            .name("Fan")
            .switch(PowerState::On)
            .build()
            .unwrap();
        let err = device
            .apply(DevicePatch::Value(Level::MAX))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ControlMismatch {
                expected: DeviceKind::Normal,
                actual: DeviceKind::Regulatable,
            }
        );
        assert_eq!(device.state(), Some(PowerState::On));
    }

    #[test]
    fn should_serialize_with_type_tag() {
        let device = Device::builder()
            .venue_id(venue())
            .name("Ceiling")
            .dimmer(Level::new(42).unwrap())
            .build()
            .unwrap();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "REGULATABLE");
        assert_eq!(json["value"], 42);
        assert!(json.get("state").is_none());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let device = Device::builder()
            .venue_id(venue())
            .name("Porch")
            .switch(PowerState::On)
            .build()
            .unwrap();
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, device);
    }

    #[test]
    fn should_parse_kind_case_insensitively() {
        assert_eq!("normal".parse::<DeviceKind>().unwrap(), DeviceKind::Normal);
        assert_eq!(
            "REGULATABLE".parse::<DeviceKind>().unwrap(),
            DeviceKind::Regulatable
        );
        assert!("dimmer".parse::<DeviceKind>().is_err());
    }
}
