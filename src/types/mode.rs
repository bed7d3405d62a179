//! Effect modes and the mode/speed pair reported by controllers.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::Speed;

/// Built-in animation effects with their wire ids.
///
/// `None` (0x61) is what a controller reports while it is showing a static
/// color; `Unknown` covers ids this library does not recognize. Only the
/// named effects (0x25–0x38) can be sent back to a device.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, EnumIter, PartialEq, Eq)]
pub enum EffectMode {
    Unknown = 0xffff,
    /// Static color, no animation running
    None = 0x61,
    SevenColorCrossFade = 0x25,
    RedGradualChange = 0x26,
    GreenGradualChange = 0x27,
    BlueGradualChange = 0x28,
    YellowGradualChange = 0x29,
    CyanGradualChange = 0x2a,
    PurpleGradualChange = 0x2b,
    WhiteGradualChange = 0x2c,
    RedGreenCrossFade = 0x2d,
    RedBlueCrossFade = 0x2e,
    GreenBlueCrossFade = 0x2f,
    SevenColorStrobeFlash = 0x30,
    RedStrobeFlash = 0x31,
    GreenStrobeFlash = 0x32,
    BlueStrobeFlash = 0x33,
    YellowStrobeFlash = 0x34,
    CyanStrobeFlash = 0x35,
    PurpleStrobeFlash = 0x36,
    WhiteStrobeFlash = 0x37,
    SevenColorJumping = 0x38,
}

impl EffectMode {
    /// Map a reported mode id to an effect.
    ///
    /// Unrecognized ids map to `Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::EffectMode;
    ///
    /// assert_eq!(EffectMode::from_id(0x25), EffectMode::SevenColorCrossFade);
    /// assert_eq!(EffectMode::from_id(0x61), EffectMode::None);
    /// assert_eq!(EffectMode::from_id(0x00), EffectMode::Unknown);
    /// ```
    pub fn from_id(id: u8) -> Self {
        EffectMode::iter()
            .find(|mode| mode.id() == u16::from(id))
            .unwrap_or(EffectMode::Unknown)
    }

    /// The numeric id of this effect.
    pub fn id(&self) -> u16 {
        *self as u16
    }

    /// The id as a command byte, for effects that can be sent to a device.
    ///
    /// `None` and `Unknown` have no command encoding.
    pub fn wire_id(&self) -> Option<u8> {
        match self.id() {
            id @ 0x25..=0x38 => Some(id as u8),
            _ => None,
        }
    }
}

/// The mode half of a controller state: which effect is selected and how
/// fast it runs.
///
/// An immutable value pair. Changing the speed produces a new value with the
/// same effect selected.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FunctionalMode {
    mode: EffectMode,
    speed: Speed,
}

impl FunctionalMode {
    /// Combine an effect with an animation speed.
    pub fn new(mode: EffectMode, speed: Speed) -> Self {
        FunctionalMode { mode, speed }
    }

    /// The selected effect.
    pub fn mode(&self) -> EffectMode {
        self.mode
    }

    /// The animation speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// The same effect at a different speed.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::{EffectMode, FunctionalMode, Speed};
    ///
    /// let mode = FunctionalMode::new(EffectMode::RedStrobeFlash, Speed::new());
    /// let faster = mode.with_speed(Speed::from_percent(90).unwrap());
    /// assert_eq!(faster.mode(), EffectMode::RedStrobeFlash);
    /// ```
    pub fn with_speed(&self, speed: Speed) -> Self {
        FunctionalMode {
            mode: self.mode,
            speed,
        }
    }
}
