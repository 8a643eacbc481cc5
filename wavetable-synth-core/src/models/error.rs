use thiserror::Error;

/// Errors surfaced by the engine session and its collaborators.
///
/// None of these are fatal to the session: every failure can be recovered by
/// retrying the command or waiting for the next lifecycle transition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// The native engine could not be allocated. The handle stays `Absent`.
    #[error("engine creation failed: {0}")]
    EngineCreation(String),

    /// A frequency or volume outside the configured bounds. Rejected before
    /// reaching the engine.
    #[error("{parameter} {value} outside supported range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// An engine command failed after being issued. The handle stays `Active`.
    #[error("native call `{command}` failed: {reason}")]
    NativeCall {
        command: &'static str,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The command dispatcher worker has shut down.
    #[error("command dispatcher closed")]
    DispatcherClosed,
}

/// Failure reported by an engine backend across the native boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct NativeError(pub String);

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl SynthError {
    pub(crate) fn native(command: &'static str, err: NativeError) -> Self {
        Self::NativeCall {
            command,
            reason: err.0,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::ParameterOutOfRange { .. })
    }
}
