//! Controller hardware class, as self-reported in state replies.

use serde::{Deserialize, Serialize};

/// The output class a controller reports in its state reply.
///
/// Derived solely from the trailing marker byte of a state reply; it cannot
/// be set from the host side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    /// Marker not reported or not recognized
    Unknown,
    /// Color strip driver (RGB, RGBW, RGBWW)
    Rgb,
    /// Single-channel dimmer (DIM, WW, CW)
    Dim,
}

impl ControllerType {
    /// Map the state-reply marker byte to a controller type.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::ControllerType;
    ///
    /// assert_eq!(ControllerType::from_marker(0xf0), ControllerType::Rgb);
    /// assert_eq!(ControllerType::from_marker(0x0f), ControllerType::Dim);
    /// assert_eq!(ControllerType::from_marker(0x42), ControllerType::Unknown);
    /// ```
    pub fn from_marker(marker: u8) -> Self {
        match marker {
            0xf0 => ControllerType::Rgb,
            0x0f => ControllerType::Dim,
            _ => ControllerType::Unknown,
        }
    }
}
