//! Test doubles shared by the unit tests of this crate.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::{NativeError, SynthError};
use crate::models::parameters::SynthParameters;
use crate::models::state::{EngineHandle, EngineId};
use crate::traits::engine_backend::EngineBackend;
use crate::traits::synth_delegate::SynthDelegate;

/// One boundary call observed by [`FakeEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(EngineId),
    Delete(EngineId),
    Play(EngineId),
    Stop(EngineId),
    IsPlaying(EngineId),
    SetFrequency(EngineId, f32),
    SetVolume(EngineId, f32),
    SetWavetable(EngineId, u32),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    next_id: u64,
    /// Live engines and whether each is playing.
    live: HashMap<EngineId, bool>,
    deleted: HashSet<EngineId>,
    created: usize,
    fail_create: bool,
    failing: HashSet<&'static str>,
}

impl FakeState {
    /// Panics on any call against an engine that was never created or
    /// already deleted.
    fn live_engine(&mut self, engine: EngineId) -> &mut bool {
        assert!(
            !self.deleted.contains(&engine),
            "native call on deleted {}",
            engine
        );
        self.live
            .get_mut(&engine)
            .unwrap_or_else(|| panic!("native call on unknown {}", engine))
    }

    fn command(&mut self, name: &'static str, engine: EngineId, call: Call) -> Result<&mut bool, NativeError> {
        self.calls.push(call);
        if self.failing.contains(name) {
            self.live_engine(engine);
            return Err(NativeError::new(format!("{} rejected", name)));
        }
        Ok(self.live_engine(engine))
    }
}

/// In-memory engine backend recording every call.
///
/// Clones share state, so a test can keep one clone while the session owns
/// another.
#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<FakeState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.lock().fail_create = fail;
    }

    /// Make every later call of `command` fail.
    pub fn fail_command(&self, command: &'static str) {
        self.state.lock().failing.insert(command);
    }

    pub fn created_count(&self) -> usize {
        self.state.lock().created
    }

    pub fn deleted_count(&self) -> usize {
        self.state.lock().deleted.len()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }
}

impl EngineBackend for FakeEngine {
    fn create(&mut self) -> Result<EngineId, NativeError> {
        let mut s = self.state.lock();
        if s.fail_create {
            return Err(NativeError::new("out of audio streams"));
        }
        s.next_id += 1;
        let engine = EngineId::new(s.next_id);
        s.live.insert(engine, false);
        s.created += 1;
        s.calls.push(Call::Create(engine));
        Ok(engine)
    }

    fn delete(&mut self, engine: EngineId) {
        let mut s = self.state.lock();
        s.live_engine(engine);
        s.live.remove(&engine);
        s.deleted.insert(engine);
        s.calls.push(Call::Delete(engine));
    }

    fn play(&mut self, engine: EngineId) -> Result<(), NativeError> {
        let mut s = self.state.lock();
        *s.command("play", engine, Call::Play(engine))? = true;
        Ok(())
    }

    fn stop(&mut self, engine: EngineId) -> Result<(), NativeError> {
        let mut s = self.state.lock();
        *s.command("stop", engine, Call::Stop(engine))? = false;
        Ok(())
    }

    fn is_playing(&mut self, engine: EngineId) -> Result<bool, NativeError> {
        let mut s = self.state.lock();
        let playing = s.command("is_playing", engine, Call::IsPlaying(engine))?;
        Ok(*playing)
    }

    fn set_frequency(&mut self, engine: EngineId, frequency_hz: f32) -> Result<(), NativeError> {
        let mut s = self.state.lock();
        s.command("set_frequency", engine, Call::SetFrequency(engine, frequency_hz))?;
        Ok(())
    }

    fn set_volume(&mut self, engine: EngineId, volume_db: f32) -> Result<(), NativeError> {
        let mut s = self.state.lock();
        s.command("set_volume", engine, Call::SetVolume(engine, volume_db))?;
        Ok(())
    }

    fn set_wavetable(&mut self, engine: EngineId, wavetable: u32) -> Result<(), NativeError> {
        let mut s = self.state.lock();
        s.command("set_wavetable", engine, Call::SetWavetable(engine, wavetable))?;
        Ok(())
    }
}

/// Delegate that records every notification.
#[derive(Default)]
pub struct RecordingDelegate {
    parameters: Mutex<Vec<SynthParameters>>,
    handles: Mutex<Vec<EngineHandle>>,
    errors: Mutex<Vec<SynthError>>,
}

impl RecordingDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn parameters(&self) -> Vec<SynthParameters> {
        self.parameters.lock().clone()
    }

    pub fn handles(&self) -> Vec<EngineHandle> {
        self.handles.lock().clone()
    }

    pub fn errors(&self) -> Vec<SynthError> {
        self.errors.lock().clone()
    }
}

impl SynthDelegate for RecordingDelegate {
    fn on_parameters_changed(&self, parameters: &SynthParameters) {
        self.parameters.lock().push(*parameters);
    }

    fn on_handle_changed(&self, handle: &EngineHandle) {
        self.handles.lock().push(*handle);
    }

    fn on_error(&self, error: &SynthError) {
        self.errors.lock().push(error.clone());
    }
}
