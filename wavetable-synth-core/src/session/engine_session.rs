use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use crate::models::config::SynthConfiguration;
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::{NativeError, SynthError};
use crate::models::parameters::{SynthParameters, TransportState};
use crate::models::state::{EngineHandle, EngineId};
use crate::models::wavetable::WavetableKind;
use crate::traits::engine_backend::EngineBackend;
use crate::traits::synth_delegate::SynthDelegate;
use crate::traits::wavetable_synthesizer::WavetableSynthesizer;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// The backend lives inside the lock together with the engine slot, so the
/// only way to reach the native engine is through a held guard.
struct SessionState<B> {
    backend: B,
    engine: Option<EngineId>,
    parameters: SynthParameters,
    diagnostics: SessionDiagnostics,
}

/// Which parts of the state a command changed. The delegate is handed the
/// values current at delivery time, not the values at the time of change.
#[derive(Default)]
struct Changes {
    handle: bool,
    parameters: bool,
}

impl Changes {
    fn merge(&mut self, other: Changes) {
        self.handle |= other.handle;
        self.parameters |= other.parameters;
    }

    fn is_empty(&self) -> bool {
        !self.handle && !self.parameters
    }
}

/// Notifications queued for the thread currently calling the delegate.
#[derive(Default)]
struct Delivery {
    active: bool,
    pending: Changes,
    errors: Vec<SynthError>,
}

impl<B: EngineBackend> SessionState<B> {
    fn new(backend: B, config: &SynthConfiguration) -> Self {
        Self {
            backend,
            engine: None,
            parameters: SynthParameters::from_configuration(config),
            diagnostics: SessionDiagnostics::new(),
        }
    }

    /// Return the live engine, creating one if the slot is empty.
    ///
    /// A failed restore is reported against `command`, the command that
    /// triggered the creation. The engine stays active.
    fn ensure_engine(
        &mut self,
        config: &SynthConfiguration,
        command: &'static str,
        changes: &mut Changes,
    ) -> Result<EngineId, SynthError> {
        if let Some(engine) = self.engine {
            return Ok(engine);
        }

        let engine = self.backend.create().map_err(|e| {
            log::error!("Failed to create synthesizer engine: {}", e);
            SynthError::EngineCreation(e.0)
        })?;

        self.engine = Some(engine);
        self.diagnostics.engines_created += 1;
        self.diagnostics.last_created_at = Some(Utc::now());
        log::info!("Created {}", engine);

        // A fresh engine is silent.
        self.set_transport(TransportState::Stopped, changes);
        changes.handle = true;

        if config.restore_parameters_on_create {
            self.restore_parameters(engine).map_err(|e| match e {
                SynthError::NativeCall { command: step, reason } => SynthError::NativeCall {
                    command,
                    reason: format!("restoring {} on new engine: {}", step, reason),
                },
                other => other,
            })?;
        }
        Ok(engine)
    }

    fn restore_parameters(&mut self, engine: EngineId) -> Result<(), SynthError> {
        let SynthParameters {
            frequency_hz,
            volume_db,
            wavetable,
            ..
        } = self.parameters;
        log::debug!(
            "Restoring {} Hz, {} dB, {:?} on {}",
            frequency_hz,
            volume_db,
            wavetable,
            engine
        );
        self.native("set_wavetable", |b| b.set_wavetable(engine, wavetable.ordinal()))?;
        self.native("set_frequency", |b| b.set_frequency(engine, frequency_hz))?;
        self.native("set_volume", |b| b.set_volume(engine, volume_db))
    }

    /// Delete the live engine, if any. Returns whether one was deleted.
    fn teardown(&mut self, changes: &mut Changes) -> bool {
        let Some(engine) = self.engine.take() else {
            return false;
        };
        self.backend.delete(engine);
        self.diagnostics.engines_destroyed += 1;
        log::info!("Destroyed {}", engine);

        self.set_transport(TransportState::Stopped, changes);
        changes.handle = true;
        true
    }

    /// Issue one native call, mapping and counting its outcome.
    fn native<T>(
        &mut self,
        command: &'static str,
        call: impl FnOnce(&mut B) -> Result<T, NativeError>,
    ) -> Result<T, SynthError> {
        match call(&mut self.backend) {
            Ok(value) => {
                self.diagnostics.commands_applied += 1;
                Ok(value)
            }
            Err(e) => {
                self.diagnostics.native_failures += 1;
                log::warn!("Native call `{}` failed: {}", command, e);
                Err(SynthError::native(command, e))
            }
        }
    }

    fn set_transport(&mut self, transport: TransportState, changes: &mut Changes) {
        if self.parameters.transport != transport {
            self.parameters.transport = transport;
            changes.parameters = true;
        }
    }

    fn update_parameters(&mut self, update: impl FnOnce(&mut SynthParameters), changes: &mut Changes) {
        update(&mut self.parameters);
        changes.parameters = true;
    }
}

/// Single owner of the native synthesizer engine.
///
/// Every command runs under one mutex for its full duration: the implicit
/// create, the native call, and the parameter bookkeeping. Commands from
/// different threads are applied in lock acquisition order and never
/// interleave, and no command can observe an engine that `destroy` is
/// tearing down.
///
/// ```text
/// caller ─┐
/// caller ─┼─▶ [Mutex<SessionState>] ─▶ ensure engine ─▶ EngineBackend call
/// binder ─┘          │
///                    └─▶ (lock released) ─▶ delivery queue ─▶ SynthDelegate
/// ```
///
/// One thread at a time talks to the delegate. A command finishing while
/// another thread is delivering queues its changes and returns; the
/// delivering thread drains the queue before it stops, reading the state as
/// it is at that moment. The last notification a delegate receives therefore
/// matches [`EngineSession::parameters`] and [`EngineSession::handle`].
pub struct EngineSession<B: EngineBackend> {
    config: SynthConfiguration,
    state: Mutex<SessionState<B>>,
    delegate: Option<Arc<dyn SynthDelegate>>,
    delivery: Mutex<Delivery>,
}

impl<B: EngineBackend> EngineSession<B> {
    /// Session with the default configuration. No engine is created yet.
    pub fn new(backend: B) -> Self {
        let config = SynthConfiguration::default();
        Self {
            state: Mutex::new(SessionState::new(backend, &config)),
            config,
            delegate: None,
            delivery: Mutex::new(Delivery::default()),
        }
    }

    pub fn with_configuration(backend: B, config: SynthConfiguration) -> Result<Self, SynthError> {
        config.validate().map_err(SynthError::InvalidConfiguration)?;
        Ok(Self {
            state: Mutex::new(SessionState::new(backend, &config)),
            config,
            delegate: None,
            delivery: Mutex::new(Delivery::default()),
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SynthDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn configuration(&self) -> &SynthConfiguration {
        &self.config
    }

    /// Snapshot of the desired parameters and transport state.
    pub fn parameters(&self) -> SynthParameters {
        self.state.lock().parameters
    }

    pub fn handle(&self) -> EngineHandle {
        self.state.lock().engine.into()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.state.lock().diagnostics.clone()
    }

    /// Create the engine if absent. No-op when already active.
    pub fn ensure_active(&self) -> Result<(), SynthError> {
        self.run("ensure_active", |_, _, _| Ok(()))
    }

    /// Start audio output on the engine's render thread.
    pub fn play(&self) -> Result<(), SynthError> {
        self.run("play", |state, engine, changes| {
            state.native("play", |b| b.play(engine))?;
            state.set_transport(TransportState::Playing, changes);
            Ok(())
        })
    }

    /// Halt audio output. The engine stays allocated.
    pub fn stop(&self) -> Result<(), SynthError> {
        self.run("stop", |state, engine, changes| {
            state.native("stop", |b| b.stop(engine))?;
            state.set_transport(TransportState::Stopped, changes);
            Ok(())
        })
    }

    /// Query the engine's transport state. Apart from creating an absent
    /// engine, the stored parameters are left untouched.
    pub fn is_playing(&self) -> Result<bool, SynthError> {
        self.run("is_playing", |state, engine, _| {
            state.native("is_playing", |b| b.is_playing(engine))
        })
    }

    /// Stop if playing, play if stopped. Returns the new transport state.
    pub fn toggle_playback(&self) -> Result<TransportState, SynthError> {
        self.run("toggle_playback", |state, engine, changes| {
            let next = if state.native("is_playing", |b| b.is_playing(engine))? {
                state.native("stop", |b| b.stop(engine))?;
                TransportState::Stopped
            } else {
                state.native("play", |b| b.play(engine))?;
                TransportState::Playing
            };
            state.set_transport(next, changes);
            Ok(next)
        })
    }

    /// Out-of-range values are rejected before the engine is touched.
    pub fn set_frequency(&self, frequency_hz: f32) -> Result<(), SynthError> {
        let frequency_hz = self.reject_out_of_range(
            self.config.frequency_range.check("frequency", frequency_hz),
        )?;
        self.run("set_frequency", |state, engine, changes| {
            state.native("set_frequency", |b| b.set_frequency(engine, frequency_hz))?;
            state.update_parameters(|p| p.frequency_hz = frequency_hz, changes);
            Ok(())
        })
    }

    /// Out-of-range values are rejected before the engine is touched.
    pub fn set_volume(&self, volume_db: f32) -> Result<(), SynthError> {
        let volume_db =
            self.reject_out_of_range(self.config.volume_range.check("volume", volume_db))?;
        self.run("set_volume", |state, engine, changes| {
            state.native("set_volume", |b| b.set_volume(engine, volume_db))?;
            state.update_parameters(|p| p.volume_db = volume_db, changes);
            Ok(())
        })
    }

    pub fn set_wavetable(&self, wavetable: WavetableKind) -> Result<(), SynthError> {
        self.run("set_wavetable", |state, engine, changes| {
            state.native("set_wavetable", |b| b.set_wavetable(engine, wavetable.ordinal()))?;
            state.update_parameters(|p| p.wavetable = wavetable, changes);
            Ok(())
        })
    }

    /// Tear down the engine if active. Safe to call repeatedly.
    pub fn destroy(&self) -> Result<(), SynthError> {
        let mut changes = Changes::default();
        let destroyed = self.state.lock().teardown(&mut changes);
        if !destroyed {
            log::debug!("destroy: no engine to tear down");
        }
        self.notify(changes, None);
        Ok(())
    }

    // --- Internal helpers ---

    /// Run `op` against the live engine with the lock held throughout.
    fn run<T>(
        &self,
        command: &'static str,
        op: impl FnOnce(&mut SessionState<B>, EngineId, &mut Changes) -> Result<T, SynthError>,
    ) -> Result<T, SynthError> {
        let mut changes = Changes::default();
        let result = {
            let mut state = self.state.lock();
            log::debug!("{}", command);
            state
                .ensure_engine(&self.config, command, &mut changes)
                .and_then(|engine| op(&mut *state, engine, &mut changes))
        };
        self.notify(changes, result.as_ref().err());
        result
    }

    fn reject_out_of_range(&self, checked: Result<f32, SynthError>) -> Result<f32, SynthError> {
        checked.map_err(|e| {
            log::warn!("Rejected parameter: {}", e);
            self.notify(Changes::default(), Some(&e));
            e
        })
    }

    fn notify(&self, changes: Changes, error: Option<&SynthError>) {
        let Some(ref delegate) = self.delegate else {
            return;
        };
        {
            let mut delivery = self.delivery.lock();
            delivery.pending.merge(changes);
            delivery.errors.extend(error.cloned());
            if delivery.active {
                return;
            }
            delivery.active = true;
        }

        loop {
            let (changes, errors) = {
                let mut delivery = self.delivery.lock();
                if delivery.pending.is_empty() && delivery.errors.is_empty() {
                    delivery.active = false;
                    return;
                }
                (
                    std::mem::take(&mut delivery.pending),
                    std::mem::take(&mut delivery.errors),
                )
            };
            let (handle, parameters) = {
                let state = self.state.lock();
                (EngineHandle::from(state.engine), state.parameters)
            };
            if changes.handle {
                delegate.on_handle_changed(&handle);
            }
            if changes.parameters {
                delegate.on_parameters_changed(&parameters);
            }
            for error in &errors {
                delegate.on_error(error);
            }
        }
    }
}

impl<B: EngineBackend> Drop for EngineSession<B> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(engine) = state.engine.take() {
            log::info!("Session dropped with live {}, destroying", engine);
            state.backend.delete(engine);
        }
    }
}

impl<B: EngineBackend> WavetableSynthesizer for EngineSession<B> {
    fn ensure_active(&self) -> Result<(), SynthError> {
        Self::ensure_active(self)
    }

    fn play(&self) -> Result<(), SynthError> {
        Self::play(self)
    }

    fn stop(&self) -> Result<(), SynthError> {
        Self::stop(self)
    }

    fn is_playing(&self) -> Result<bool, SynthError> {
        Self::is_playing(self)
    }

    fn toggle_playback(&self) -> Result<TransportState, SynthError> {
        Self::toggle_playback(self)
    }

    fn set_frequency(&self, frequency_hz: f32) -> Result<(), SynthError> {
        Self::set_frequency(self, frequency_hz)
    }

    fn set_volume(&self, volume_db: f32) -> Result<(), SynthError> {
        Self::set_volume(self, volume_db)
    }

    fn set_wavetable(&self, wavetable: WavetableKind) -> Result<(), SynthError> {
        Self::set_wavetable(self, wavetable)
    }

    fn destroy(&self) -> Result<(), SynthError> {
        Self::destroy(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::testing::{Call, FakeEngine, RecordingDelegate};

    fn session() -> (EngineSession<FakeEngine>, FakeEngine) {
        let engine = FakeEngine::new();
        (EngineSession::new(engine.clone()), engine)
    }

    #[test]
    fn starts_absent_without_native_calls() {
        let (session, engine) = session();
        assert_eq!(session.handle(), EngineHandle::Absent);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn ensure_active_is_idempotent() {
        let (session, engine) = session();
        session.ensure_active().unwrap();
        let handle = session.handle();
        session.ensure_active().unwrap();

        assert!(handle.is_active());
        assert_eq!(session.handle(), handle);
        assert_eq!(engine.created_count(), 1);
    }

    #[test]
    fn creation_failure_leaves_handle_absent() {
        let (session, engine) = session();
        engine.fail_create(true);

        let err = session.play().unwrap_err();
        assert!(matches!(err, SynthError::EngineCreation(_)));
        assert_eq!(session.handle(), EngineHandle::Absent);
        assert!(!engine.calls().iter().any(|c| matches!(c, Call::Play(_))));

        engine.fail_create(false);
        session.play().unwrap();
        assert!(session.handle().is_active());
    }

    #[test]
    fn destroy_while_absent_is_noop() {
        let (session, engine) = session();
        session.destroy().unwrap();
        session.destroy().unwrap();
        assert_eq!(session.handle(), EngineHandle::Absent);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn destroy_twice_deletes_once() {
        let (session, engine) = session();
        session.ensure_active().unwrap();
        session.destroy().unwrap();
        session.destroy().unwrap();

        assert_eq!(engine.deleted_count(), 1);
        assert_eq!(session.diagnostics().live_engines(), 0);
    }

    #[test]
    fn parameter_commands_resurrect_engine() {
        let (session, engine) = session();

        session.set_frequency(880.0).unwrap();
        assert!(session.handle().is_active());
        session.destroy().unwrap();

        session.set_volume(-12.0).unwrap();
        assert!(session.handle().is_active());
        session.destroy().unwrap();

        session.set_wavetable(WavetableKind::Saw).unwrap();
        assert!(session.handle().is_active());
        assert_eq!(engine.created_count(), 3);
    }

    #[test]
    fn out_of_range_frequency_is_rejected_before_engine() {
        let (session, engine) = session();
        let err = session.set_frequency(20.0).unwrap_err();

        assert_eq!(
            err,
            SynthError::ParameterOutOfRange {
                parameter: "frequency",
                value: 20.0,
                min: 40.0,
                max: 3100.0,
            }
        );
        assert_eq!(session.parameters().frequency_hz, 440.0);
        assert_eq!(session.handle(), EngineHandle::Absent);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn out_of_range_volume_and_nan_are_rejected() {
        let (session, _engine) = session();
        assert!(session.set_volume(1.0).unwrap_err().is_out_of_range());
        assert!(session.set_volume(-61.0).unwrap_err().is_out_of_range());
        assert!(session.set_frequency(f32::NAN).unwrap_err().is_out_of_range());
        assert_eq!(session.parameters().volume_db, -24.0);
    }

    #[test]
    fn frequency_round_trips_exactly() {
        let (session, engine) = session();
        session.set_frequency(440.0).unwrap();
        assert_eq!(session.parameters().frequency_hz, 440.0);

        session.set_frequency(3100.0).unwrap();
        assert_eq!(session.parameters().frequency_hz, 3100.0);
        let id = session.handle().id().unwrap();
        assert_eq!(engine.calls().last(), Some(&Call::SetFrequency(id, 3100.0)));
    }

    #[test]
    fn native_failure_keeps_engine_active() {
        let (session, engine) = session();
        session.ensure_active().unwrap();
        engine.fail_command("play");

        let err = session.play().unwrap_err();
        assert_eq!(
            err,
            SynthError::NativeCall {
                command: "play",
                reason: "play rejected".into(),
            }
        );
        assert!(session.handle().is_active());
        assert_eq!(session.parameters().transport, TransportState::Stopped);
        assert_eq!(session.diagnostics().native_failures, 1);
    }

    #[test]
    fn failed_parameter_call_keeps_previous_value() {
        let (session, engine) = session();
        engine.fail_command("set_volume");
        session.ensure_active().unwrap_err();
        assert!(session.handle().is_active());

        assert!(session.set_volume(-6.0).is_err());
        assert_eq!(session.parameters().volume_db, -24.0);
    }

    #[test]
    fn fresh_engine_receives_remembered_parameters() {
        let (session, engine) = session();
        session.set_wavetable(WavetableKind::Square).unwrap();
        session.set_frequency(220.0).unwrap();
        session.destroy().unwrap();
        engine.clear_calls();

        session.ensure_active().unwrap();
        let id = session.handle().id().unwrap();
        assert_eq!(
            engine.calls(),
            vec![
                Call::Create(id),
                Call::SetWavetable(id, WavetableKind::Square.ordinal()),
                Call::SetFrequency(id, 220.0),
                Call::SetVolume(id, -24.0),
            ]
        );
    }

    #[test]
    fn restore_can_be_disabled() {
        let engine = FakeEngine::new();
        let config = SynthConfiguration {
            restore_parameters_on_create: false,
            ..Default::default()
        };
        let session = EngineSession::with_configuration(engine.clone(), config).unwrap();
        session.ensure_active().unwrap();
        assert_eq!(engine.calls().len(), 1);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = SynthConfiguration {
            default_frequency_hz: 10.0,
            ..Default::default()
        };
        let result = EngineSession::with_configuration(FakeEngine::new(), config);
        assert!(matches!(result, Err(SynthError::InvalidConfiguration(_))));
    }

    #[test]
    fn toggle_alternates_transport() {
        let (session, _engine) = session();
        assert_eq!(session.toggle_playback().unwrap(), TransportState::Playing);
        assert!(session.is_playing().unwrap());
        assert_eq!(session.toggle_playback().unwrap(), TransportState::Stopped);
        assert!(!session.is_playing().unwrap());
    }

    #[test]
    fn destroy_resets_transport() {
        let (session, _engine) = session();
        session.play().unwrap();
        assert_eq!(session.parameters().transport, TransportState::Playing);

        session.destroy().unwrap();
        assert_eq!(session.parameters().transport, TransportState::Stopped);
        assert_eq!(session.parameters().transport.label(), "play");
    }

    #[test]
    fn delegate_sees_handle_and_parameter_changes() {
        let (mut session, engine) = session();
        let delegate = RecordingDelegate::new();
        session.set_delegate(delegate.clone());

        session.set_frequency(1000.0).unwrap();
        session.destroy().unwrap();
        engine.fail_command("stop");
        let _ = session.stop();

        let handles = delegate.handles();
        assert_eq!(handles.len(), 3);
        assert!(handles[0].is_active());
        assert_eq!(handles[1], EngineHandle::Absent);
        assert!(handles[2].is_active());
        assert_eq!(delegate.parameters().last().unwrap().frequency_hz, 1000.0);
        assert_eq!(delegate.errors().len(), 1);
    }

    #[test]
    fn drop_destroys_live_engine() {
        let engine = FakeEngine::new();
        {
            let session = EngineSession::new(engine.clone());
            session.play().unwrap();
        }
        assert_eq!(engine.created_count(), 1);
        assert_eq!(engine.deleted_count(), 1);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn last_lifecycle_call_wins() {
        let (session, _engine) = session();
        let script = [true, true, false, true, false, false, true];
        for &activate in &script {
            if activate {
                session.ensure_active().unwrap();
            } else {
                session.destroy().unwrap();
            }
        }
        assert!(session.handle().is_active());
        session.destroy().unwrap();
        assert!(session.handle().is_absent());
    }

    #[test]
    fn concurrent_play_and_destroy_never_touch_deleted_engine() {
        let engine = FakeEngine::new();
        let session = Arc::new(EngineSession::new(engine.clone()));

        let players: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    for _ in 0..200 {
                        session.play().unwrap();
                        session.set_frequency(660.0).unwrap();
                        session.is_playing().unwrap();
                    }
                })
            })
            .collect();
        let destroyers: Vec<_> = (0..2)
            .map(|_| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    for _ in 0..200 {
                        session.destroy().unwrap();
                    }
                })
            })
            .collect();

        for handle in players.into_iter().chain(destroyers) {
            handle.join().expect("worker panicked");
        }

        let diagnostics = session.diagnostics();
        assert_eq!(engine.created_count() as u64, diagnostics.engines_created);
        assert_eq!(engine.deleted_count() as u64, diagnostics.engines_destroyed);
        assert!(engine.live_count() <= 1);
        assert_eq!(engine.live_count() as u64, diagnostics.live_engines());
    }

    #[test]
    fn concurrent_ensure_active_creates_one_engine() {
        let engine = FakeEngine::new();
        let session = Arc::new(EngineSession::new(engine.clone()));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                thread::spawn(move || session.ensure_active().unwrap())
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(engine.created_count(), 1);
    }

    #[test]
    fn usable_through_trait_object() {
        let (session, _engine) = session();
        let synth: &dyn WavetableSynthesizer = &session;
        synth.set_wavetable(WavetableKind::Triangle).unwrap();
        synth.play().unwrap();
        assert!(synth.is_playing().unwrap());
        synth.destroy().unwrap();
        assert!(session.handle().is_absent());
    }

    #[test]
    fn restore_failure_is_reported_against_triggering_command() {
        let (session, engine) = session();
        engine.fail_command("set_volume");

        match session.set_frequency(500.0).unwrap_err() {
            SynthError::NativeCall { command, reason } => {
                assert_eq!(command, "set_frequency");
                assert!(reason.contains("restoring set_volume"), "{}", reason);
                assert!(reason.contains("set_volume rejected"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.handle().is_active());
        assert_eq!(session.parameters().frequency_hz, 440.0);

        // The engine is live now, so a retry skips the restore.
        session.set_frequency(500.0).unwrap();
        assert_eq!(session.parameters().frequency_hz, 500.0);
    }

    #[test]
    fn is_playing_leaves_parameters_untouched() {
        let (mut session, _engine) = session();
        let delegate = RecordingDelegate::new();
        session.set_delegate(delegate.clone());

        session.play().unwrap();
        let notified = delegate.parameters().len();
        let before = session.parameters();

        assert!(session.is_playing().unwrap());
        assert_eq!(session.parameters(), before);
        assert_eq!(delegate.parameters().len(), notified);
        assert_eq!(delegate.handles().len(), 1);
    }

    /// Blocks inside the callback that reports `gate_hz` until released.
    struct GatedDelegate {
        gate_hz: f32,
        entered: crossbeam_channel::Sender<()>,
        release: crossbeam_channel::Receiver<()>,
        seen: Mutex<Vec<SynthParameters>>,
    }

    impl SynthDelegate for GatedDelegate {
        fn on_parameters_changed(&self, parameters: &SynthParameters) {
            if parameters.frequency_hz == self.gate_hz {
                let _ = self.entered.send(());
                let _ = self.release.recv();
            }
            self.seen.lock().push(*parameters);
        }

        fn on_handle_changed(&self, _handle: &EngineHandle) {}

        fn on_error(&self, _error: &SynthError) {}
    }

    #[test]
    fn delegate_ends_on_latest_parameters_when_commands_race() {
        let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let delegate = Arc::new(GatedDelegate {
            gate_hz: 100.0,
            entered: entered_tx,
            release: release_rx,
            seen: Mutex::new(Vec::new()),
        });
        let (mut session, _engine) = session();
        session.set_delegate(delegate.clone());
        let session = Arc::new(session);

        let first = {
            let session = Arc::clone(&session);
            thread::spawn(move || session.set_frequency(100.0).unwrap())
        };
        entered_rx.recv().unwrap();

        // Does not wait for the blocked delivery on the other thread.
        session.set_frequency(200.0).unwrap();
        release_tx.send(()).unwrap();
        first.join().unwrap();

        let seen = delegate.seen.lock().clone();
        assert_eq!(seen.last(), Some(&session.parameters()));
        assert_eq!(session.parameters().frequency_hz, 200.0);
    }
}
