use crate::models::error::NativeError;
use crate::models::state::EngineId;

/// The native engine boundary.
///
/// Mirrors the C entry points of the DSP engine one-to-one. Implemented by:
/// - `LoggingEngine` (in-process, logs every call)
/// - `AndroidNativeEngine` (FFI into `libwavetablesynthesizer` on Android)
///
/// The session owns its backend and only calls it while holding its lock, so
/// implementations never see two calls at once. Every call except `create`
/// receives an id previously returned by `create` and not yet passed to
/// `delete`.
pub trait EngineBackend: Send {
    /// Allocate a new engine instance. The engine starts stopped and renders
    /// on its own real-time thread once playing.
    fn create(&mut self) -> Result<EngineId, NativeError>;

    /// Tear down an engine instance and release its native resources.
    fn delete(&mut self, engine: EngineId);

    fn play(&mut self, engine: EngineId) -> Result<(), NativeError>;

    fn stop(&mut self, engine: EngineId) -> Result<(), NativeError>;

    fn is_playing(&mut self, engine: EngineId) -> Result<bool, NativeError>;

    fn set_frequency(&mut self, engine: EngineId, frequency_hz: f32) -> Result<(), NativeError>;

    fn set_volume(&mut self, engine: EngineId, volume_db: f32) -> Result<(), NativeError>;

    /// `wavetable` is a `WavetableKind` ordinal.
    fn set_wavetable(&mut self, engine: EngineId, wavetable: u32) -> Result<(), NativeError>;
}

impl<B: EngineBackend + ?Sized> EngineBackend for Box<B> {
    fn create(&mut self) -> Result<EngineId, NativeError> {
        (**self).create()
    }

    fn delete(&mut self, engine: EngineId) {
        (**self).delete(engine)
    }

    fn play(&mut self, engine: EngineId) -> Result<(), NativeError> {
        (**self).play(engine)
    }

    fn stop(&mut self, engine: EngineId) -> Result<(), NativeError> {
        (**self).stop(engine)
    }

    fn is_playing(&mut self, engine: EngineId) -> Result<bool, NativeError> {
        (**self).is_playing(engine)
    }

    fn set_frequency(&mut self, engine: EngineId, frequency_hz: f32) -> Result<(), NativeError> {
        (**self).set_frequency(engine, frequency_hz)
    }

    fn set_volume(&mut self, engine: EngineId, volume_db: f32) -> Result<(), NativeError> {
        (**self).set_volume(engine, volume_db)
    }

    fn set_wavetable(&mut self, engine: EngineId, wavetable: u32) -> Result<(), NativeError> {
        (**self).set_wavetable(engine, wavetable)
    }
}
