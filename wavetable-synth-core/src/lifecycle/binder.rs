use std::sync::Arc;

use crate::lifecycle::source::{LifecycleObserver, LifecycleSource, SubscriptionId};
use crate::models::error::SynthError;
use crate::models::state::LifecyclePhase;
use crate::traits::wavetable_synthesizer::WavetableSynthesizer;

/// Ties the engine's lifetime to the host's foreground state.
///
/// Foreground creates the engine, background destroys it. Repeated
/// transitions rely on `ensure_active` and `destroy` being idempotent.
pub struct LifecycleBinder {
    synth: Arc<dyn WavetableSynthesizer>,
}

impl LifecycleBinder {
    pub fn new(synth: Arc<dyn WavetableSynthesizer>) -> Self {
        Self { synth }
    }

    /// Subscribe a binder for `synth` to `source`.
    pub fn bind(source: &LifecycleSource, synth: Arc<dyn WavetableSynthesizer>) -> SubscriptionId {
        source.subscribe(Arc::new(Self::new(synth)))
    }
}

impl LifecycleObserver for LifecycleBinder {
    fn on_phase(&self, phase: LifecyclePhase) -> Result<(), SynthError> {
        match phase {
            LifecyclePhase::Foreground => self.synth.ensure_active(),
            LifecyclePhase::Background => self.synth.destroy(),
        }
    }
}
