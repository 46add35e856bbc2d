//! Configuration file model

use std::{collections::BTreeMap, path::Path, str::FromStr};

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::{
    color::{ColorCorrection, CurveError, ResponseCurve},
    dmx::{ChannelLayout, DmxError},
    led_map::{CanvasSize, LedMap, LedMapError},
};

mod layouts;
pub use layouts::*;

pub type Color = palette::rgb::LinSrgb<u8>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("error serializing configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("invalid channel layout: {0}")]
    Channels(#[from] DmxError),
    #[error("invalid response curve: {0}")]
    Curve(#[from] CurveError),
    #[error("error mapping LEDs: {0}")]
    LedMap(#[from] LedMapError),
}

fn default_response() -> f32 {
    1.0
}

fn default_pattern() -> String {
    "rgb".to_owned()
}

fn default_start_channel() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Canvas {
    #[validate(range(min = 1))]
    pub width: usize,
    #[validate(range(min = 1))]
    pub height: usize,
}

impl From<&Canvas> for CanvasSize {
    fn from(canvas: &Canvas) -> Self {
        CanvasSize::new(canvas.width, canvas.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Response exponent, ignored when `curve` is set
    pub response: f32,
    #[validate(range(min = -1.0, max = 1.0))]
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2))]
    pub curve: Option<Vec<f32>>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            response: default_response(),
            temperature: 0.0,
            curve: None,
        }
    }
}

/// Validate that every default refers to a single pattern character
fn validate_placeholders(
    defaults: &BTreeMap<String, u8>,
) -> Result<(), validator::ValidationError> {
    if defaults.keys().any(|key| key.chars().count() != 1) {
        return Err(validator::ValidationError::new("invalid_placeholder"));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// One character per channel: `r`, `g`, `b` or a placeholder from `defaults`
    #[validate(length(min = 1))]
    pub pattern: String,
    pub start_channel: u32,
    #[validate(custom(function = "validate_placeholders"))]
    pub defaults: BTreeMap<String, u8>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            start_channel: default_start_channel(),
            defaults: BTreeMap::new(),
        }
    }
}

/// Validate the layout of a fixture
fn validate_layout(fixture: &Fixture) -> Result<(), validator::ValidationError> {
    fixture.layout.validate().map_err(|errors| {
        let mut error = validator::ValidationError::new("invalid_layout");
        error.message = Some(errors.to_string().into());
        error
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_layout"))]
pub struct Fixture {
    #[serde(default)]
    pub name: String,
    /// Index of the first LED, defaults to right after the previous fixture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 1_048_575))] // led_map::MAX_LEDS - 1
    pub start: Option<usize>,
    pub layout: Layout,
}

/// Complete setup: canvas, color correction, output channels and fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[validate(nested)]
    pub canvas: Canvas,
    #[serde(default)]
    #[validate(nested)]
    pub color: ColorConfig,
    #[serde(default)]
    #[validate(nested)]
    pub channels: ChannelConfig,
    #[serde(default)]
    #[validate(nested)]
    pub fixtures: Vec<Fixture>,
}

impl Config {
    /// Read and validate a TOML configuration file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = std::fs::read_to_string(path)?.parse()?;

        info!(
            path = %path.display(),
            fixtures = config.fixtures.len(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Map the LEDs of every fixture, in order
    pub fn led_map(&self) -> Result<LedMap, ConfigError> {
        let mut map = LedMap::new(CanvasSize::from(&self.canvas));
        let mut next = 0;

        for fixture in &self.fixtures {
            let layout: &'static str = (&fixture.layout).into();
            let start = fixture.start.unwrap_or(next);
            let count = map.assign(start, &fixture.layout.to_positions())?;

            if count == 0 {
                warn!(fixture = %fixture.name, layout, "fixture maps no LEDs");
            } else {
                debug!(fixture = %fixture.name, layout, start, count, "mapped fixture");
            }

            next = start + count;
        }

        Ok(map)
    }

    pub fn color_correction(&self) -> Result<ColorCorrection, ConfigError> {
        let mut correction = ColorCorrection::new(self.color.response, self.color.temperature);

        if let Some(samples) = &self.color.curve {
            correction.set_curve(ResponseCurve::new(samples.clone())?);
        }

        Ok(correction)
    }

    pub fn channel_layout(&self) -> Result<ChannelLayout, ConfigError> {
        let defaults = self.channels.defaults.iter().filter_map(|(key, &value)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some((c, value)),
                _ => None,
            }
        });

        Ok(ChannelLayout::new(&self.channels.pattern, self.channels.start_channel)?
            .with_defaults(defaults))
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Parse and validate TOML configuration text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
