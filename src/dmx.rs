//! Channel pattern compiler
//!
//! Colors are expanded into `(channel, value)` pairs following a [ChannelLayout], either streamed
//! to a [DmxSender] or collected into a fixed-length frame where channel `n` lands at index
//! `n - 1`.

use thiserror::Error;

use crate::models::Color;

mod layout;
pub use layout::*;

mod sender;
pub use sender::*;

/// Number of channels in a DMX512 universe
pub const DMX_UNIVERSE_SIZE: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DmxError {
    #[error("channel pattern is empty")]
    EmptyPattern,
    #[error("invalid frame length: {0}")]
    InvalidFrameLength(usize),
}

/// Send the channels of `colors` to `sender`, in ascending channel order
///
/// Returns the number of channels sent.
pub fn emit<S>(colors: &[Color], layout: &ChannelLayout, sender: &mut S) -> usize
where
    S: DmxSender + ?Sized,
{
    let mut sent = 0;
    for (channel, value) in layout.channels(colors) {
        sender.send(channel, value);
        sent += 1;
    }

    trace!(leds = colors.len(), channels = sent, "emitted channels");
    sent
}

/// Build a zeroed frame of `frame_length` bytes holding the channels of `colors`
///
/// Channels are 1-based: channel `n` is stored at index `n - 1`. Channels outside the frame are
/// dropped, which allows building a partial view of a larger setup.
pub fn build_frame(
    colors: &[Color],
    layout: &ChannelLayout,
    frame_length: usize,
) -> Result<Vec<u8>, DmxError> {
    if frame_length == 0 {
        return Err(DmxError::InvalidFrameLength(frame_length));
    }

    let mut frame = vec![0u8; frame_length];
    let mut dropped = 0usize;

    for (channel, value) in layout.channels(colors) {
        match (channel as usize)
            .checked_sub(1)
            .and_then(|index| frame.get_mut(index))
        {
            Some(slot) => *slot = value,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        trace!(dropped, frame_length, "channels outside of the frame");
    }

    Ok(frame)
}
