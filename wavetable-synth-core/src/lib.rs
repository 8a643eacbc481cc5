//! # wavetable-synth-core
//!
//! Platform-agnostic control core for a wavetable synthesizer engine.
//!
//! Owns exactly one native engine instance per session, serializes every
//! command against it, and ties its lifetime to the host's
//! foreground/background transitions. Platform backends implement the
//! `EngineBackend` trait and plug into the generic `EngineSession`.
//!
//! ## Architecture
//!
//! ```text
//! wavetable-synth-core (this crate)
//! ├── traits/        ← EngineBackend, WavetableSynthesizer, SynthDelegate
//! ├── models/        ← SynthError, SynthConfiguration, EngineHandle, WavetableKind, etc.
//! ├── session/       ← EngineSession (guarded engine), SynthCommand, CommandDispatcher
//! ├── lifecycle/     ← LifecycleSource, LifecycleBinder
//! └── presentation   ← slider/unit conversions for the UI layer
//! ```

pub mod lifecycle;
pub mod models;
pub mod presentation;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use lifecycle::binder::LifecycleBinder;
pub use lifecycle::source::{LifecycleObserver, LifecycleSource, SubscriptionId};
pub use models::config::{ParameterRange, SynthConfiguration};
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::{NativeError, SynthError};
pub use models::parameters::{SynthParameters, TransportState};
pub use models::state::{EngineHandle, EngineId, LifecyclePhase};
pub use models::wavetable::WavetableKind;
pub use presentation::{frequency_label, FrequencySlider, VolumeSlider};
pub use session::command::{CommandOutcome, SynthCommand};
pub use session::dispatcher::{CommandDispatcher, CommandTicket};
pub use session::engine_session::EngineSession;
pub use traits::engine_backend::EngineBackend;
pub use traits::synth_delegate::SynthDelegate;
pub use traits::wavetable_synthesizer::WavetableSynthesizer;
