//! State reply decoding.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::types::{ChannelLevels, ControllerType, EffectMode, FunctionalMode, PowerState, Speed};

type Result<T> = std::result::Result<T, Error>;

/// Length of the reply a controller sends to the state probe.
pub const STATE_FRAME_LEN: usize = 14;

/// A decoded snapshot of a controller's state.
///
/// Produced by decoding one state reply; a later query replaces the whole
/// snapshot.
///
/// The reply layout:
///
/// | offset | meaning |
/// |--------|---------|
/// | 0, 1   | header, always `0x81 0x25` |
/// | 2      | power code |
/// | 3      | mode id |
/// | 4      | unused |
/// | 5      | animation speed |
/// | 6–8    | red, green, blue |
/// | 9      | warm white |
/// | 10     | filler |
/// | 11     | cool white |
/// | 12     | controller type marker |
/// | 13     | checksum |
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    power: PowerState,
    mode: FunctionalMode,
    controller_type: ControllerType,
    channels: ChannelLevels,
}

impl DeviceState {
    /// Decode a 14-byte state reply.
    ///
    /// Validates the length and the `0x81 0x25` header; unknown power codes,
    /// mode ids, and type markers decode to their `Unknown` variants. The
    /// trailing checksum byte is not validated: the checksum scheme was never
    /// confirmed for device-to-host frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use magichome_rs::{DeviceState, PowerState};
    ///
    /// let reply = [
    ///     0x81, 0x25, 0x23, 0x61, 0x00, 0x1f, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0xf0, 0x00,
    /// ];
    /// let state = DeviceState::decode(&reply).unwrap();
    /// assert_eq!(state.power(), PowerState::On);
    /// assert_eq!(state.channels().red, 0xff);
    /// ```
    pub fn decode(reply: &[u8]) -> Result<Self> {
        if reply.len() != STATE_FRAME_LEN {
            return Err(Error::FrameLength(reply.len()));
        }
        if reply[0] != 0x81 || reply[1] != 0x25 {
            return Err(Error::FrameHeader {
                first: reply[0],
                second: reply[1],
            });
        }
        Ok(DeviceState {
            power: PowerState::from_code(reply[2]),
            mode: FunctionalMode::new(EffectMode::from_id(reply[3]), Speed::create_or(reply[5])),
            controller_type: ControllerType::from_marker(reply[12]),
            // reply[10] is filler between the white channels
            channels: ChannelLevels::new(reply[6], reply[7], reply[8], reply[9], reply[11]),
        })
    }

    /// The reported power state.
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// The reported effect mode and its speed.
    pub fn mode(&self) -> FunctionalMode {
        self.mode
    }

    /// The self-reported hardware class.
    pub fn controller_type(&self) -> ControllerType {
        self.controller_type
    }

    /// The reported output channel levels.
    pub fn channels(&self) -> ChannelLevels {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply() -> [u8; STATE_FRAME_LEN] {
        [
            0x81, 0x25, 0x23, 0x26, 0x00, 0x10, 0x11, 0x22, 0x33, 0x44, 0x01, 0x55, 0xf0, 0x00,
        ]
    }

    #[test]
    fn test_decode_well_formed_reply() {
        let state = DeviceState::decode(&reply()).unwrap();
        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.mode().mode(), EffectMode::RedGradualChange);
        assert_eq!(state.mode().speed().value(), 0x10);
        assert_eq!(state.controller_type(), ControllerType::Rgb);
        assert_eq!(state.channels(), ChannelLevels::new(0x11, 0x22, 0x33, 0x44, 0x55));
    }

    #[test]
    fn test_decode_dim_controller() {
        let mut frame = reply();
        frame[2] = 0x24;
        frame[12] = 0x0f;
        let state = DeviceState::decode(&frame).unwrap();
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.controller_type(), ControllerType::Dim);
    }

    #[test]
    fn test_decode_unknown_fields() {
        let mut frame = reply();
        frame[2] = 0x99;
        frame[3] = 0x99;
        frame[12] = 0x99;
        let state = DeviceState::decode(&frame).unwrap();
        assert_eq!(state.power(), PowerState::Unknown);
        assert_eq!(state.mode().mode(), EffectMode::Unknown);
        assert_eq!(state.controller_type(), ControllerType::Unknown);
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        let mut frame = reply();
        frame[0] = 0x82;
        assert_eq!(
            DeviceState::decode(&frame).unwrap_err(),
            Error::FrameHeader {
                first: 0x82,
                second: 0x25
            }
        );

        let mut frame = reply();
        frame[1] = 0x00;
        assert!(matches!(
            DeviceState::decode(&frame),
            Err(Error::FrameHeader { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(
            DeviceState::decode(&reply()[..13]).unwrap_err(),
            Error::FrameLength(13)
        );
        assert_eq!(DeviceState::decode(&[]).unwrap_err(), Error::FrameLength(0));
    }

    #[test]
    fn test_checksum_byte_is_not_validated() {
        let mut frame = reply();
        frame[13] = 0xde;
        assert!(DeviceState::decode(&frame).is_ok());
    }
}
