use crate::models::error::SynthError;
use crate::models::parameters::TransportState;
use crate::models::wavetable::WavetableKind;
use crate::session::engine_session::EngineSession;
use crate::traits::engine_backend::EngineBackend;
use crate::traits::wavetable_synthesizer::WavetableSynthesizer;

/// One command-API call as a value, so it can be queued or sent to a worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthCommand {
    EnsureActive,
    Play,
    Stop,
    IsPlaying,
    TogglePlayback,
    SetFrequency(f32),
    SetVolume(f32),
    SetWavetable(WavetableKind),
    Destroy,
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Answer to `IsPlaying`.
    Playing(bool),
    /// New transport state after `TogglePlayback`.
    Transport(TransportState),
}

impl SynthCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnsureActive => "ensure_active",
            Self::Play => "play",
            Self::Stop => "stop",
            Self::IsPlaying => "is_playing",
            Self::TogglePlayback => "toggle_playback",
            Self::SetFrequency(_) => "set_frequency",
            Self::SetVolume(_) => "set_volume",
            Self::SetWavetable(_) => "set_wavetable",
            Self::Destroy => "destroy",
        }
    }

    /// Run this command to completion on `synth`.
    pub fn apply(self, synth: &dyn WavetableSynthesizer) -> Result<CommandOutcome, SynthError> {
        match self {
            Self::EnsureActive => synth.ensure_active().map(|_| CommandOutcome::Done),
            Self::Play => synth.play().map(|_| CommandOutcome::Done),
            Self::Stop => synth.stop().map(|_| CommandOutcome::Done),
            Self::IsPlaying => synth.is_playing().map(CommandOutcome::Playing),
            Self::TogglePlayback => synth.toggle_playback().map(CommandOutcome::Transport),
            Self::SetFrequency(hz) => synth.set_frequency(hz).map(|_| CommandOutcome::Done),
            Self::SetVolume(db) => synth.set_volume(db).map(|_| CommandOutcome::Done),
            Self::SetWavetable(kind) => synth.set_wavetable(kind).map(|_| CommandOutcome::Done),
            Self::Destroy => synth.destroy().map(|_| CommandOutcome::Done),
        }
    }
}

impl<B: EngineBackend> EngineSession<B> {
    /// Run `command` synchronously on the calling thread.
    pub fn execute(&self, command: SynthCommand) -> Result<CommandOutcome, SynthError> {
        command.apply(self)
    }
}
