use serde::{Deserialize, Serialize};

/// Oscillator shapes the engine can play.
///
/// The declaration order is the engine selector order: the ordinal of each
/// variant is the integer passed across the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavetableKind {
    #[default]
    Sine,
    Triangle,
    Square,
    Saw,
}

impl WavetableKind {
    /// Every variant, in ordinal order.
    pub const ALL: [WavetableKind; 4] = [
        WavetableKind::Sine,
        WavetableKind::Triangle,
        WavetableKind::Square,
        WavetableKind::Saw,
    ];

    /// Engine-side selector code.
    pub fn ordinal(self) -> u32 {
        match self {
            Self::Sine => 0,
            Self::Triangle => 1,
            Self::Square => 2,
            Self::Saw => 3,
        }
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Key the presentation layer resolves to a localized label.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Triangle => "triangle",
            Self::Square => "square",
            Self::Saw => "sawtooth",
        }
    }
}
