//! Color correction applied to sampled pixels

use std::convert::TryFrom;

use thiserror::Error;

use crate::models::Color;

mod utils;
pub use utils::{argb_to_color, color_to_argb, color_to_unit, unit_to_channel};

/// Red and blue shift applied at full temperature, in the shifted direction and the other one
const TEMPERATURE_MAJOR: f32 = 0.2;
const TEMPERATURE_MINOR: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("response curve needs at least 2 samples, got {0}")]
    TooShort(usize),
    #[error("response curve sample {0} is not a finite number")]
    NotFinite(usize),
}

/// Lookup table remapping normalized channel values
///
/// Channels are quantized to the nearest sample, no interpolation takes place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct ResponseCurve(Vec<f32>);

impl ResponseCurve {
    pub fn new(samples: Vec<f32>) -> Result<Self, CurveError> {
        if samples.len() < 2 {
            return Err(CurveError::TooShort(samples.len()));
        }

        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(CurveError::NotFinite(index));
        }

        Ok(Self(samples))
    }

    pub fn samples(&self) -> &[f32] {
        &self.0
    }

    pub fn lookup(&self, c: f32) -> f32 {
        let last = self.0.len() - 1;
        let index = (c * last as f32).round() as usize;
        self.0[index.min(last)]
    }
}

impl TryFrom<Vec<f32>> for ResponseCurve {
    type Error = CurveError;

    fn try_from(samples: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<ResponseCurve> for Vec<f32> {
    fn from(curve: ResponseCurve) -> Self {
        curve.0
    }
}

/// Response remapping currently in effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response<'c> {
    Exponent(f32),
    Curve(&'c ResponseCurve),
}

/// Color correction state
///
/// Either the response exponent or the response curve is active, never both: setting a curve
/// disables the exponent, setting the exponent drops the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCorrection {
    exponent: f32,
    temperature: f32,
    curve: Option<ResponseCurve>,
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self {
            exponent: 1.0,
            temperature: 0.0,
            curve: None,
        }
    }
}

impl ColorCorrection {
    pub fn new(exponent: f32, temperature: f32) -> Self {
        let mut correction = Self::default();
        correction.set_response(exponent);
        correction.set_temperature(temperature);
        correction
    }

    /// Use a power-law response, `1.0` being linear
    pub fn set_response(&mut self, exponent: f32) {
        if self.curve.take().is_some() {
            debug!(exponent, "response curve replaced by exponent");
        }

        self.exponent = exponent;
    }

    /// Use a response curve instead of the exponent
    pub fn set_curve(&mut self, curve: ResponseCurve) {
        debug!(samples = curve.samples().len(), "response curve set");
        self.curve = Some(curve);
    }

    /// Set the temperature shift, from `-1.0` (warmer) to `1.0` (cooler)
    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(-1.0, 1.0)
        };
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Last exponent set, whether or not a curve overrides it
    pub fn response_exponent(&self) -> f32 {
        self.exponent
    }

    pub fn curve(&self) -> Option<&ResponseCurve> {
        self.curve.as_ref()
    }

    pub fn active_response(&self) -> Response<'_> {
        match &self.curve {
            Some(curve) => Response::Curve(curve),
            None => Response::Exponent(self.exponent),
        }
    }

    pub(crate) fn replace(&mut self, exponent: f32, temperature: f32, curve: Option<ResponseCurve>) {
        self.exponent = exponent;
        self.set_temperature(temperature);
        self.curve = curve;
    }

    fn shift_temperature(&self, r: f32, b: f32) -> (f32, f32) {
        let t = self.temperature;

        if t > 0.0 {
            (r - t * TEMPERATURE_MAJOR, b + t * TEMPERATURE_MINOR)
        } else if t < 0.0 {
            (r + t * TEMPERATURE_MINOR, b - t * TEMPERATURE_MAJOR)
        } else {
            (r, b)
        }
    }

    /// Correct a sampled color
    pub fn correct(&self, color: Color) -> Color {
        let (r, g, b) = color_to_unit(color);
        let (r, b) = self.shift_temperature(r, b);

        let response = self.active_response();
        let remap = |c: f32| {
            let c = c.clamp(0.0, 1.0);
            unit_to_channel(match response {
                Response::Exponent(exponent) => c.powf(exponent),
                Response::Curve(curve) => curve.lookup(c),
            })
        };

        Color::new(remap(r), remap(g), remap(b))
    }

    /// Correct a packed `0xAARRGGBB` pixel
    pub fn correct_argb(&self, argb: u32) -> Color {
        self.correct(argb_to_color(argb))
    }
}
