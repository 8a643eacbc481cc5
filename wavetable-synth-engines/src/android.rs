//! FFI binding to the C++ wavetable synthesizer (`libwavetablesynthesizer.so`).
//!
//! The library renders on its own Oboe real-time thread; these entry points
//! only post control messages to it. Handles are opaque non-zero integers,
//! `0` means allocation failed. Control calls return `0` on success and a
//! negative status otherwise.
//!
//! The stock library only exports JNI entry points. This binding assumes a
//! thin C shim in the same `.so` exporting the `wavetable_synthesizer_*`
//! symbols below over the C++ engine class.

use std::os::raw::c_int;

use wavetable_synth_core::models::error::NativeError;
use wavetable_synth_core::models::state::EngineId;
use wavetable_synth_core::traits::engine_backend::EngineBackend;

#[link(name = "wavetablesynthesizer")]
extern "C" {
    fn wavetable_synthesizer_create() -> u64;
    fn wavetable_synthesizer_delete(handle: u64);
    fn wavetable_synthesizer_play(handle: u64) -> c_int;
    fn wavetable_synthesizer_stop(handle: u64) -> c_int;
    fn wavetable_synthesizer_is_playing(handle: u64) -> c_int;
    fn wavetable_synthesizer_set_frequency(handle: u64, frequency_hz: f32) -> c_int;
    fn wavetable_synthesizer_set_volume(handle: u64, volume_db: f32) -> c_int;
    fn wavetable_synthesizer_set_wavetable(handle: u64, wavetable: c_int) -> c_int;
}

fn check(call: &str, status: c_int) -> Result<(), NativeError> {
    if status < 0 {
        Err(NativeError::new(format!("{} returned status {}", call, status)))
    } else {
        Ok(())
    }
}

/// Engine backend backed by the native Android synthesizer library.
///
/// Stateless on the Rust side: every instance lives behind its native handle.
#[derive(Debug, Default)]
pub struct AndroidNativeEngine;

impl AndroidNativeEngine {
    pub fn new() -> Self {
        Self
    }
}

// SAFETY (all calls below): the session only passes handles returned by
// `wavetable_synthesizer_create` and not yet deleted, and never calls two
// entry points concurrently.
impl EngineBackend for AndroidNativeEngine {
    fn create(&mut self) -> Result<EngineId, NativeError> {
        let handle = unsafe { wavetable_synthesizer_create() };
        if handle == 0 {
            return Err(NativeError::new("wavetable_synthesizer_create returned null handle"));
        }
        log::debug!("Native synthesizer created: {:#x}", handle);
        Ok(EngineId::new(handle))
    }

    fn delete(&mut self, engine: EngineId) {
        unsafe { wavetable_synthesizer_delete(engine.raw()) };
        log::debug!("Native synthesizer deleted: {:#x}", engine.raw());
    }

    fn play(&mut self, engine: EngineId) -> Result<(), NativeError> {
        check("play", unsafe { wavetable_synthesizer_play(engine.raw()) })
    }

    fn stop(&mut self, engine: EngineId) -> Result<(), NativeError> {
        check("stop", unsafe { wavetable_synthesizer_stop(engine.raw()) })
    }

    fn is_playing(&mut self, engine: EngineId) -> Result<bool, NativeError> {
        let status = unsafe { wavetable_synthesizer_is_playing(engine.raw()) };
        check("is_playing", status)?;
        Ok(status > 0)
    }

    fn set_frequency(&mut self, engine: EngineId, frequency_hz: f32) -> Result<(), NativeError> {
        check("set_frequency", unsafe {
            wavetable_synthesizer_set_frequency(engine.raw(), frequency_hz)
        })
    }

    fn set_volume(&mut self, engine: EngineId, volume_db: f32) -> Result<(), NativeError> {
        check("set_volume", unsafe {
            wavetable_synthesizer_set_volume(engine.raw(), volume_db)
        })
    }

    fn set_wavetable(&mut self, engine: EngineId, wavetable: u32) -> Result<(), NativeError> {
        let wavetable = c_int::try_from(wavetable)
            .map_err(|_| NativeError::new(format!("wavetable ordinal {} out of range", wavetable)))?;
        check("set_wavetable", unsafe {
            wavetable_synthesizer_set_wavetable(engine.raw(), wavetable)
        })
    }
}
