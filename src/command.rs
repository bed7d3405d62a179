//! Command frame encoding.
//!
//! Every command sent over the TCP control channel is a short binary frame
//! whose last byte is the modulo-256 sum of the preceding bytes. Encoding is
//! validated up front: values with no wire representation are rejected here,
//! before any I/O is attempted.

use crate::checksum::with_checksum;
use crate::errors::Error;
use crate::types::{ChannelLevels, EffectMode, PowerState, Speed};

type Result<T> = std::result::Result<T, Error>;

/// The fixed probe that asks a controller for its 14-byte state reply.
pub const STATE_QUERY: [u8; 4] = [0x81, 0x8a, 0x8b, 0x96];

/// Encode a power command: `[0x71, code, 0x0f]` plus checksum.
///
/// Only `On` and `Off` have wire codes; `Unknown` is rejected.
///
/// # Examples
///
/// ```
/// use magichome_rs::{PowerState, power_command};
///
/// assert_eq!(power_command(PowerState::On).unwrap(), vec![0x71, 0x23, 0x0f, 0xa3]);
/// assert!(power_command(PowerState::Unknown).is_err());
/// ```
pub fn power_command(state: PowerState) -> Result<Vec<u8>> {
    let code = state.code().ok_or(Error::UnsupportedPower(state))?;
    Ok(with_checksum(&[0x71, code, 0x0f]))
}

/// Encode a channel command: an RGB frame followed by a white frame.
///
/// The device expects the color and white channels in two separate frames,
/// each with its own checksum, written back to back.
pub fn channel_command(levels: &ChannelLevels) -> Vec<u8> {
    let mut command = with_checksum(&[
        0x31,
        levels.red,
        levels.green,
        levels.blue,
        0x00,
        0x00,
        0xf0,
        0x0f,
    ]);
    command.extend(with_checksum(&[
        0x31,
        0x00,
        0x00,
        0x00,
        levels.warm,
        levels.cool,
        0x0f,
        0x0f,
    ]));
    command
}

/// Encode a mode command: `[0x61, id, speed, 0x0f]` plus checksum.
///
/// Valid only for the named effects; `None` and `Unknown` are rejected.
pub fn mode_command(mode: EffectMode, speed: Speed) -> Result<Vec<u8>> {
    let id = mode.wire_id().ok_or(Error::UnsupportedMode(mode))?;
    Ok(with_checksum(&[0x61, id, speed.value(), 0x0f]))
}
