//! Output channel levels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::Error;

/// Convert a percent value (0-100) to a channel level byte (0-255).
///
/// Rounds half up; rejects percents outside [0, 100] before any encoding.
///
/// # Examples
///
/// ```
/// use magichome_rs::percent_to_level;
///
/// assert_eq!(percent_to_level(0).unwrap(), 0x00);
/// assert_eq!(percent_to_level(100).unwrap(), 0xff);
/// assert!(percent_to_level(101).is_err());
/// ```
pub fn percent_to_level(percent: u8) -> Result<u8, Error> {
    if percent > 100 {
        return Err(Error::PercentOutOfRange(percent));
    }
    Ok((f64::from(percent) * 255.0 / 100.0).round() as u8)
}

/// Convert a channel level byte (0-255) to a percent value (0-100).
pub fn level_to_percent(level: u8) -> u8 {
    (f64::from(level) * 100.0 / 255.0).round() as u8
}

/// Levels for the five output channels of a controller (0-255 each).
///
/// RGB controllers drive the first three channels, dimmers the two white
/// channels; the device ignores channels it does not have.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLevels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub warm: u8,
    pub cool: u8,
}

impl ChannelLevels {
    /// Set all five channels.
    pub fn new(red: u8, green: u8, blue: u8, warm: u8, cool: u8) -> Self {
        Self {
            red,
            green,
            blue,
            warm,
            cool,
        }
    }

    /// Color channels only, whites off.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 0, 0)
    }

    /// White channels only, color off.
    pub fn white(warm: u8, cool: u8) -> Self {
        Self::new(0, 0, 0, warm, cool)
    }

    /// Build levels from percent values (0-100 each).
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::ChannelLevels;
    ///
    /// let levels = ChannelLevels::from_percent(100, 0, 0, 50, 0).unwrap();
    /// assert_eq!(levels.red, 0xff);
    /// assert_eq!(levels.warm, 128);
    /// assert!(ChannelLevels::from_percent(0, 0, 0, 0, 120).is_err());
    /// ```
    pub fn from_percent(red: u8, green: u8, blue: u8, warm: u8, cool: u8) -> Result<Self, Error> {
        Ok(Self {
            red: percent_to_level(red)?,
            green: percent_to_level(green)?,
            blue: percent_to_level(blue)?,
            warm: percent_to_level(warm)?,
            cool: percent_to_level(cool)?,
        })
    }
}

impl FromStr for ChannelLevels {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0,0,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts: Vec<u8> = s.split(',').map(|c| c.trim().parse().unwrap_or(0)).collect();
        if parts.len() == 5 {
            Ok(Self::new(parts[0], parts[1], parts[2], parts[3], parts[4]))
        } else {
            Err("Expected format: r,g,b,ww,cw".into())
        }
    }
}
