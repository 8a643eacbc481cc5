use serde::{Deserialize, Serialize};

use super::config::SynthConfiguration;
use super::wavetable::WavetableKind;

/// Whether the engine is producing audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    Playing,
    #[default]
    Stopped,
}

impl TransportState {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Label key for the play/stop button: the action a press would take.
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "stop",
            Self::Stopped => "play",
        }
    }
}

impl From<bool> for TransportState {
    fn from(playing: bool) -> Self {
        if playing {
            Self::Playing
        } else {
            Self::Stopped
        }
    }
}

/// Desired synthesizer settings, owned by the session.
///
/// Values are stored exactly as the caller supplied them; no unit conversion
/// happens inside the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthParameters {
    pub frequency_hz: f32,
    pub volume_db: f32,
    pub wavetable: WavetableKind,
    pub transport: TransportState,
}

impl SynthParameters {
    pub fn from_configuration(config: &SynthConfiguration) -> Self {
        Self {
            frequency_hz: config.default_frequency_hz,
            volume_db: config.default_volume_db,
            wavetable: config.default_wavetable,
            transport: TransportState::Stopped,
        }
    }
}

impl Default for SynthParameters {
    fn default() -> Self {
        Self::from_configuration(&SynthConfiguration::default())
    }
}
