//! Channel pattern of a single LED

use std::{collections::BTreeMap, fmt, str::FromStr};

use super::{DmxError, DMX_UNIVERSE_SIZE};
use crate::models::Color;

/// Meaning of one character of a channel pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Red,
    Green,
    Blue,
    /// Any other character, resolved through the layout defaults
    Fixed(char),
}

impl From<char> for ChannelKind {
    fn from(c: char) -> Self {
        match c {
            'r' => Self::Red,
            'g' => Self::Green,
            'b' => Self::Blue,
            other => Self::Fixed(other),
        }
    }
}

impl From<ChannelKind> for char {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Red => 'r',
            ChannelKind::Green => 'g',
            ChannelKind::Blue => 'b',
            ChannelKind::Fixed(c) => c,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// Expansion of every LED color into consecutive output channels
///
/// LED `i` occupies channels `start_channel + i * pattern.len()` onwards, one per pattern
/// character. Placeholders without a default value output `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    pattern: Vec<ChannelKind>,
    start_channel: u32,
    defaults: BTreeMap<char, u8>,
}

impl ChannelLayout {
    pub fn new(pattern: &str, start_channel: u32) -> Result<Self, DmxError> {
        if pattern.is_empty() {
            return Err(DmxError::EmptyPattern);
        }

        Ok(Self {
            pattern: pattern.chars().map(ChannelKind::from).collect(),
            start_channel,
            defaults: BTreeMap::new(),
        })
    }

    /// Set the value output for `placeholder`
    pub fn with_default(mut self, placeholder: char, value: u8) -> Self {
        self.defaults.insert(placeholder, value);
        self
    }

    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = (char, u8)>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    pub fn pattern(&self) -> &[ChannelKind] {
        &self.pattern
    }

    pub fn start_channel(&self) -> u32 {
        self.start_channel
    }

    pub fn defaults(&self) -> &BTreeMap<char, u8> {
        &self.defaults
    }

    pub fn default_for(&self, placeholder: char) -> u8 {
        self.defaults.get(&placeholder).copied().unwrap_or(0)
    }

    pub fn value_for(&self, kind: ChannelKind, color: Color) -> u8 {
        match kind {
            ChannelKind::Red => color.red,
            ChannelKind::Green => color.green,
            ChannelKind::Blue => color.blue,
            ChannelKind::Fixed(c) => self.default_for(c),
        }
    }

    pub fn channels_per_led(&self) -> usize {
        self.pattern.len()
    }

    /// Number of channels used by `led_count` LEDs
    pub fn channel_count(&self, led_count: usize) -> u64 {
        led_count as u64 * self.pattern.len() as u64
    }

    /// Last channel used by `led_count` LEDs, `None` when there are no LEDs
    pub fn last_channel(&self, led_count: usize) -> Option<u64> {
        match self.channel_count(led_count) {
            0 => None,
            n => Some(u64::from(self.start_channel) + n - 1),
        }
    }

    /// Number of 512-channel universes needed to address `led_count` LEDs
    pub fn universe_count(&self, led_count: usize) -> u64 {
        let size = DMX_UNIVERSE_SIZE as u64;
        self.last_channel(led_count)
            .map_or(0, |last| (last.max(1) + size - 1) / size)
    }

    /// `(channel, value)` pairs for `colors`, in output order
    pub fn channels<'a>(&'a self, colors: &'a [Color]) -> impl Iterator<Item = (u32, u8)> + 'a {
        let values = colors.iter().flat_map(move |&color| {
            self.pattern
                .iter()
                .map(move |&kind| self.value_for(kind, color))
        });

        (self.start_channel..=u32::MAX).zip(values)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in &self.pattern {
            write!(f, "{}", kind)?;
        }

        write!(f, "@{}", self.start_channel)
    }
}

impl FromStr for ChannelLayout {
    type Err = DmxError;

    /// Parse a pattern starting at channel 1
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, 1)
    }
}
