//! Histogram channels addressed by tone configs.

use serde::{Deserialize, Serialize};

/// One of the five tone components a multi-channel config tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(usize)]
pub enum Channel {
    /// Composite value channel, applied on top of the color channels.
    #[default]
    Value = 0,
    /// Red channel.
    Red = 1,
    /// Green channel.
    Green = 2,
    /// Blue channel.
    Blue = 3,
    /// Alpha channel.
    Alpha = 4,
}

/// Number of channels in a tone config.
pub const NUM_CHANNELS: usize = 5;

impl Channel {
    /// All channels in their fixed serialization order.
    pub const ALL: [Channel; NUM_CHANNELS] = [
        Channel::Value,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::Alpha,
    ];

    /// Array index of this channel.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
