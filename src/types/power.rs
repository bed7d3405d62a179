//! Power state of a controller.

use serde::{Deserialize, Serialize};

/// Power state of a controller.
///
/// `Unknown` is what a controller reports before the first state query
/// succeeds, or when it answers with a code this library does not know.
/// It cannot be sent back to the device.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// State not reported or not recognized
    Unknown,
    /// Output stage enabled
    On,
    /// Output stage disabled
    Off,
}

impl PowerState {
    const ON_CODE: u8 = 0x23;
    const OFF_CODE: u8 = 0x24;

    /// Map a reported wire code to a power state.
    ///
    /// Unrecognized codes map to `Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::PowerState;
    ///
    /// assert_eq!(PowerState::from_code(0x23), PowerState::On);
    /// assert_eq!(PowerState::from_code(0x24), PowerState::Off);
    /// assert_eq!(PowerState::from_code(0x00), PowerState::Unknown);
    /// ```
    pub fn from_code(code: u8) -> Self {
        match code {
            Self::ON_CODE => PowerState::On,
            Self::OFF_CODE => PowerState::Off,
            _ => PowerState::Unknown,
        }
    }

    /// The wire code for this state, if one exists.
    pub fn code(&self) -> Option<u8> {
        match self {
            PowerState::On => Some(Self::ON_CODE),
            PowerState::Off => Some(Self::OFF_CODE),
            PowerState::Unknown => None,
        }
    }
}
