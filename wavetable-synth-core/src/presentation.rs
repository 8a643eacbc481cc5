//! Unit conversions for the presentation layer.
//!
//! The session stores raw Hz and dB and rejects out-of-range values; these
//! helpers turn slider positions into in-range values before a command is
//! issued, and back again for display.

use crate::models::config::{ParameterRange, SynthConfiguration};

/// Logarithmic mapping between a slider position in `[0, 1]` and a
/// frequency in Hz, so each octave takes the same slider travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencySlider {
    range: ParameterRange,
}

impl FrequencySlider {
    /// `range.min` must be positive.
    pub fn new(range: ParameterRange) -> Self {
        Self { range }
    }

    pub fn from_configuration(config: &SynthConfiguration) -> Self {
        Self::new(config.frequency_range)
    }

    pub fn frequency_for_position(&self, position: f32) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let hz = self.range.min * (self.range.max / self.range.min).powf(position);
        // Guard against powf rounding just past the bounds.
        self.range.clamp(hz)
    }

    pub fn position_for_frequency(&self, frequency_hz: f32) -> f32 {
        let hz = self.range.clamp(frequency_hz);
        let position = (hz / self.range.min).ln() / (self.range.max / self.range.min).ln();
        position.clamp(0.0, 1.0)
    }
}

/// Volume slider working directly in dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSlider {
    range: ParameterRange,
}

impl VolumeSlider {
    pub fn new(range: ParameterRange) -> Self {
        Self { range }
    }

    pub fn from_configuration(config: &SynthConfiguration) -> Self {
        Self::new(config.volume_range)
    }

    pub fn range(&self) -> ParameterRange {
        self.range
    }

    pub fn volume_for_value(&self, volume_db: f32) -> f32 {
        self.range.clamp(volume_db)
    }
}

/// Frequency readout, e.g. `"440.0 Hz"`.
pub fn frequency_label(frequency_hz: f32) -> String {
    format!("{:.1} Hz", frequency_hz)
}
