//! Plain text form of the color correction settings
//!
//! One value per line: the response exponent, the temperature, then the samples of the response
//! curve if one is set.
//!
//! ```text
//! 2.2
//! -0.1
//! 0.0
//! 0.4
//! 1.0
//! ```

use std::{fmt, num::ParseFloatError, str::FromStr};

use thiserror::Error;

use crate::color::{ColorCorrection, CurveError, ResponseCurve};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("missing {name} on line {line}")]
    MissingLine { line: usize, name: &'static str },
    #[error("invalid number on line {line}: {text:?}")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("invalid response curve")]
    InvalidCurve(#[from] CurveError),
}

/// Persisted color correction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    pub response: f32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<f32>>,
}

impl ColorSettings {
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        text.parse()
    }
}

impl fmt::Display for ColorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.response)?;
        writeln!(f, "{:?}", self.temperature)?;

        for value in self.curve.iter().flatten() {
            writeln!(f, "{:?}", value)?;
        }

        Ok(())
    }
}

impl FromStr for ColorSettings {
    type Err = SettingsError;

    /// Parse settings text; trailing blank lines are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = s.trim_end().lines().enumerate().map(|(i, text)| {
            let line = i + 1;
            text.trim()
                .parse::<f32>()
                .map_err(|source| SettingsError::Parse {
                    line,
                    text: text.to_owned(),
                    source,
                })
        });

        let mut required = |line, name| {
            values
                .next()
                .unwrap_or(Err(SettingsError::MissingLine { line, name }))
        };

        let response = required(1, "response exponent")?;
        let temperature = required(2, "temperature")?;
        let curve: Vec<f32> = values.collect::<Result<_, _>>()?;

        let curve = match curve.len() {
            0 => None,
            1 => return Err(CurveError::TooShort(1).into()),
            _ => Some(curve),
        };

        Ok(Self {
            response,
            temperature,
            curve,
        })
    }
}

impl ColorCorrection {
    /// Current settings, in the form they are persisted
    pub fn settings(&self) -> ColorSettings {
        ColorSettings {
            response: self.response_exponent(),
            temperature: self.temperature(),
            curve: self.curve().map(|curve| curve.samples().to_vec()),
        }
    }

    /// Replace the whole correction state with `settings`
    ///
    /// Nothing is changed when the settings are invalid. Settings without a curve clear the
    /// active one.
    pub fn apply_settings(&mut self, settings: &ColorSettings) -> Result<(), SettingsError> {
        let curve = match &settings.curve {
            Some(samples) => Some(ResponseCurve::new(samples.clone())?),
            None => None,
        };

        self.replace(settings.response, settings.temperature, curve);
        debug!(
            response = settings.response,
            temperature = self.temperature(),
            curve = settings.curve.is_some(),
            "loaded color settings"
        );

        Ok(())
    }

    /// Parse and apply settings text, leaving the state untouched on error
    pub fn load_settings(&mut self, text: &str) -> Result<(), SettingsError> {
        let settings: ColorSettings = text.parse()?;
        self.apply_settings(&settings)
    }
}
