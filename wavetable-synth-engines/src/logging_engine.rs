//! In-process engine that logs every boundary call.
//!
//! Produces no audio. Used on desktop builds, in the sample app, and in
//! integration tests, where the observable effect of a command is its log
//! line and the settings recorded per engine instance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use wavetable_synth_core::models::error::NativeError;
use wavetable_synth_core::models::state::EngineId;
use wavetable_synth_core::models::wavetable::WavetableKind;
use wavetable_synth_core::traits::engine_backend::EngineBackend;

/// Settings of one live logging engine instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub playing: bool,
    pub frequency_hz: f32,
    pub volume_db: f32,
    pub wavetable: WavetableKind,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            playing: false,
            frequency_hz: 440.0,
            volume_db: -24.0,
            wavetable: WavetableKind::Sine,
        }
    }
}

#[derive(Default)]
struct EngineTable {
    next_id: u64,
    live: HashMap<EngineId, EngineSettings>,
    created: u64,
    deleted: u64,
}

impl EngineTable {
    fn get_mut(&mut self, engine: EngineId) -> Result<&mut EngineSettings, NativeError> {
        self.live
            .get_mut(&engine)
            .ok_or_else(|| NativeError::new(format!("no live engine {}", engine)))
    }
}

/// Engine backend that keeps per-instance settings in memory and logs each
/// call at `info` level.
pub struct LoggingEngine {
    table: Arc<Mutex<EngineTable>>,
}

impl LoggingEngine {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(EngineTable::default())),
        }
    }

    /// Read-only view of this backend's instances that stays usable after the
    /// backend is handed to a session.
    pub fn monitor(&self) -> EngineMonitor {
        EngineMonitor {
            table: Arc::clone(&self.table),
        }
    }
}

impl Default for LoggingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBackend for LoggingEngine {
    fn create(&mut self) -> Result<EngineId, NativeError> {
        let mut table = self.table.lock();
        table.next_id += 1;
        let engine = EngineId::new(table.next_id);
        table.live.insert(engine, EngineSettings::default());
        table.created += 1;
        log::info!("create() -> {}", engine);
        Ok(engine)
    }

    fn delete(&mut self, engine: EngineId) {
        let mut table = self.table.lock();
        if table.live.remove(&engine).is_some() {
            table.deleted += 1;
            log::info!("delete({})", engine);
        } else {
            log::warn!("delete({}) on unknown engine", engine);
        }
    }

    fn play(&mut self, engine: EngineId) -> Result<(), NativeError> {
        self.table.lock().get_mut(engine)?.playing = true;
        log::info!("play({})", engine);
        Ok(())
    }

    fn stop(&mut self, engine: EngineId) -> Result<(), NativeError> {
        self.table.lock().get_mut(engine)?.playing = false;
        log::info!("stop({})", engine);
        Ok(())
    }

    fn is_playing(&mut self, engine: EngineId) -> Result<bool, NativeError> {
        let playing = self.table.lock().get_mut(engine)?.playing;
        log::info!("is_playing({}) -> {}", engine, playing);
        Ok(playing)
    }

    fn set_frequency(&mut self, engine: EngineId, frequency_hz: f32) -> Result<(), NativeError> {
        self.table.lock().get_mut(engine)?.frequency_hz = frequency_hz;
        log::info!("set_frequency({}, {:.2} Hz)", engine, frequency_hz);
        Ok(())
    }

    fn set_volume(&mut self, engine: EngineId, volume_db: f32) -> Result<(), NativeError> {
        self.table.lock().get_mut(engine)?.volume_db = volume_db;
        log::info!("set_volume({}, {:.2} dB)", engine, volume_db);
        Ok(())
    }

    fn set_wavetable(&mut self, engine: EngineId, wavetable: u32) -> Result<(), NativeError> {
        let kind = WavetableKind::from_ordinal(wavetable)
            .ok_or_else(|| NativeError::new(format!("unknown wavetable ordinal {}", wavetable)))?;
        self.table.lock().get_mut(engine)?.wavetable = kind;
        log::info!("set_wavetable({}, {:?})", engine, kind);
        Ok(())
    }
}

/// Shared read-only view of a [`LoggingEngine`]'s instances.
#[derive(Clone)]
pub struct EngineMonitor {
    table: Arc<Mutex<EngineTable>>,
}

impl EngineMonitor {
    pub fn settings(&self, engine: EngineId) -> Option<EngineSettings> {
        self.table.lock().live.get(&engine).copied()
    }

    pub fn live_count(&self) -> usize {
        self.table.lock().live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.table.lock().created
    }

    pub fn deleted_count(&self) -> u64 {
        self.table.lock().deleted
    }
}
