//! # wavetable-synth-engines
//!
//! Engine backends for wavetable-synth-core.
//!
//! Provides:
//! - `LoggingEngine`: In-process engine that tracks settings and logs every call
//! - `AndroidNativeEngine`: FFI binding to the C++ `wavetablesynthesizer` library (Android only)
//!
//! ## Usage
//! ```ignore
//! use wavetable_synth_core::EngineSession;
//! use wavetable_synth_engines::LoggingEngine;
//!
//! let session = EngineSession::new(LoggingEngine::new());
//! session.play()?;
//! ```

pub mod logging_engine;

#[cfg(target_os = "android")]
pub mod android;

pub use logging_engine::{EngineMonitor, EngineSettings, LoggingEngine};

#[cfg(target_os = "android")]
pub use android::AndroidNativeEngine;
