//! Power state of a binary device.

use serde::{Deserialize, Serialize};

/// On/off state of a `NORMAL` device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl PowerState {
    /// The state a toggle moves to.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Wire representation (`on` / `off`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PowerState {
    type Err = UnknownPowerState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(UnknownPowerState(other.to_string())),
        }
    }
}

/// Returned when parsing anything other than `on` / `off`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown power state {0:?}, expected \"on\" or \"off\"")]
pub struct UnknownPowerState(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off() {
        assert_eq!(PowerState::default(), PowerState::Off);
    }

    #[test]
    fn should_invert_both_ways() {
        assert_eq!(PowerState::Off.inverse(), PowerState::On);
        assert_eq!(PowerState::On.inverse(), PowerState::Off);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(PowerState::On.to_string(), "on");
        assert_eq!(PowerState::Off.to_string(), "off");
    }

    #[test]
    fn should_parse_wire_values() {
        assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!("ON".parse::<PowerState>().is_err());
    }

    #[test]
    fn should_serialize_lowercase() {
        let json = serde_json::to_string(&PowerState::On).unwrap();
        assert_eq!(json, "\"on\"");
    }
}
