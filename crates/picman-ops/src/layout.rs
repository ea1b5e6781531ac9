//! Pixel buffer layout checks shared by the tone operations.

use crate::{OpsError, OpsResult};

/// Pixel size used when splitting buffers into parallel work units.
pub(crate) const PAR_CHUNK_PIXELS: usize = 4096;

/// Interleaved channel layouts the tone operations accept.
///
/// Grayscale and RGB, each with an optional trailing alpha component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    /// Leading color components, 1 or 3.
    pub color: usize,
    /// Whether a trailing alpha component follows them.
    pub has_alpha: bool,
}

impl Layout {
    /// Validates `channels` against `len` and classifies the layout.
    pub fn check(len: usize, channels: usize) -> OpsResult<Layout> {
        if !(1..=4).contains(&channels) {
            return Err(OpsError::UnsupportedChannels(channels));
        }

        if len % channels != 0 {
            return Err(OpsError::InvalidDimensions(format!(
                "buffer length {len} is not a multiple of {channels} channels"
            )));
        }

        let has_alpha = channels % 2 == 0;

        Ok(Layout {
            color: channels - usize::from(has_alpha),
            has_alpha,
        })
    }
}
