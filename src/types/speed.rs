//! Animation speed for effect modes.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Animation speed for effect modes, in device-native units 0 to 31.
///
/// The scale is inverted: a *smaller* byte means a *faster* animation.
/// [`Speed::percent`] and [`Speed::from_percent`] convert to and from the
/// human-facing 0–100 scale where 100 is fastest.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Speed {
    value: u8,
}

impl Default for Speed {
    fn default() -> Self {
        Self::new()
    }
}

impl Speed {
    const MAX: u8 = 31;
    const DEFAULT: u8 = 0x1f;

    /// Create a new Speed with the default value (slowest).
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::Speed;
    ///
    /// assert_eq!(Speed::new().value(), 31);
    /// assert_eq!(Speed::new().percent(), 0);
    /// ```
    pub fn new() -> Self {
        Speed {
            value: Self::DEFAULT,
        }
    }

    /// Get the device-native speed byte.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Create a new Speed with the given device byte.
    ///
    /// Returns `None` if value is outside the valid range (0-31).
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::Speed;
    ///
    /// assert!(Speed::create(0).is_some());
    /// assert!(Speed::create(31).is_some());
    /// assert!(Speed::create(32).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Speed { value })
        } else {
            None
        }
    }

    /// Create a Speed, using the default if value is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::Speed;
    ///
    /// assert_eq!(Speed::create_or(4).value(), 4);
    /// assert_eq!(Speed::create_or(200).value(), 31);
    /// ```
    pub fn create_or(value: u8) -> Self {
        Self::create(value).unwrap_or_default()
    }

    /// Create a Speed from a percent value, 0 (slowest) to 100 (fastest).
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::Speed;
    ///
    /// assert_eq!(Speed::from_percent(100).unwrap().value(), 0);
    /// assert_eq!(Speed::from_percent(0).unwrap().value(), 31);
    /// assert!(Speed::from_percent(101).is_err());
    /// ```
    pub fn from_percent(percent: u8) -> Result<Self, Error> {
        if percent > 100 {
            return Err(Error::PercentOutOfRange(percent));
        }
        let value = (31.0 - f64::from(percent) * 31.0 / 100.0).round() as u8;
        Ok(Speed {
            value: value.min(Self::MAX),
        })
    }

    /// This speed as a percent, 0 (slowest) to 100 (fastest).
    pub fn percent(&self) -> u8 {
        (f64::from(Self::MAX - self.value) * 100.0 / 31.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_round_trip() {
        for percent in 0..=100u8 {
            let speed = Speed::from_percent(percent).unwrap();
            assert!(speed.value() <= 31);
            // 31 device steps cover 100 percent, so a round trip may drift by
            // up to one full step
            let back = speed.percent();
            assert!(
                back.abs_diff(percent) <= 2,
                "percent {percent} -> byte {} -> percent {back}",
                speed.value()
            );
        }
    }

    #[test]
    fn test_percent_scale_is_inverted() {
        assert!(
            Speed::from_percent(90).unwrap().value() < Speed::from_percent(10).unwrap().value()
        );
    }

    #[test]
    fn test_percent_out_of_range() {
        assert_eq!(
            Speed::from_percent(101).unwrap_err(),
            Error::PercentOutOfRange(101)
        );
    }
}
