use crate::models::error::SynthError;
use crate::models::parameters::TransportState;
use crate::models::wavetable::WavetableKind;

/// Command API offered to the presentation layer.
///
/// Every operation is callable from any thread and may block while another
/// command holds the engine. All commands except `destroy` create the engine
/// first if it is absent.
pub trait WavetableSynthesizer: Send + Sync {
    /// Create the engine if absent. Idempotent.
    fn ensure_active(&self) -> Result<(), SynthError>;

    fn play(&self) -> Result<(), SynthError>;

    /// Halt output. The engine stays allocated.
    fn stop(&self) -> Result<(), SynthError>;

    /// Ask the engine whether it is producing audio. Read-only apart from
    /// creating an absent engine; stored parameters are not rewritten.
    fn is_playing(&self) -> Result<bool, SynthError>;

    /// Play if stopped, stop if playing, as one command.
    fn toggle_playback(&self) -> Result<TransportState, SynthError>;

    fn set_frequency(&self, frequency_hz: f32) -> Result<(), SynthError>;

    fn set_volume(&self, volume_db: f32) -> Result<(), SynthError>;

    fn set_wavetable(&self, wavetable: WavetableKind) -> Result<(), SynthError>;

    /// Tear the engine down if active. Idempotent.
    fn destroy(&self) -> Result<(), SynthError>;
}
