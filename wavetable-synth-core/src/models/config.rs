use serde::{Deserialize, Serialize};

use super::error::SynthError;
use super::wavetable::WavetableKind;

/// Closed interval `[min, max]` of accepted values for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
}

impl ParameterRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Reject `value` unless it lies inside the range.
    pub fn check(&self, parameter: &'static str, value: f32) -> Result<f32, SynthError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(SynthError::ParameterOutOfRange {
                parameter,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    fn validate(&self, name: &str) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(format!("{} bounds must be finite", name));
        }
        if self.min >= self.max {
            return Err(format!(
                "{} range is empty: [{}, {}]",
                name, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Configuration for an engine session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfiguration {
    /// Accepted oscillator frequencies in Hz (default: 40–3100).
    pub frequency_range: ParameterRange,

    /// Accepted output volumes in dB (default: -60–0).
    pub volume_range: ParameterRange,

    /// Frequency remembered before the first `set_frequency` (default: 440).
    pub default_frequency_hz: f32,

    /// Volume remembered before the first `set_volume` (default: -24).
    pub default_volume_db: f32,

    pub default_wavetable: WavetableKind,

    /// Push the remembered frequency, volume and wavetable into every freshly
    /// created engine (default: true).
    pub restore_parameters_on_create: bool,
}

impl SynthConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        self.frequency_range.validate("frequency")?;
        self.volume_range.validate("volume")?;
        if !self.frequency_range.contains(self.default_frequency_hz) {
            return Err(format!(
                "default frequency {} outside frequency range",
                self.default_frequency_hz
            ));
        }
        if !self.volume_range.contains(self.default_volume_db) {
            return Err(format!(
                "default volume {} outside volume range",
                self.default_volume_db
            ));
        }
        Ok(())
    }

    /// Parse a JSON document. Omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SynthError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SynthError::InvalidConfiguration(format!("failed to parse: {}", e)))?;
        config.validate().map_err(SynthError::InvalidConfiguration)?;
        Ok(config)
    }
}

impl Default for SynthConfiguration {
    fn default() -> Self {
        Self {
            frequency_range: ParameterRange::new(40.0, 3100.0),
            volume_range: ParameterRange::new(-60.0, 0.0),
            default_frequency_hz: 440.0,
            default_volume_db: -24.0,
            default_wavetable: WavetableKind::Sine,
            restore_parameters_on_create: true,
        }
    }
}
