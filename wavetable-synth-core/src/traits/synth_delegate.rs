use crate::models::error::SynthError;
use crate::models::parameters::SynthParameters;
use crate::models::state::EngineHandle;

/// Observer for session state changes.
///
/// Methods are called after the command finished and the session lock was
/// released, never concurrently with each other. Usually that is the thread
/// that issued the command; when another thread is already delivering, that
/// thread reports the change instead. Values are the ones current at
/// delivery time. Implementations should marshal to the UI thread if needed.
pub trait SynthDelegate: Send + Sync {
    /// Called when frequency, volume, wavetable or transport changed.
    fn on_parameters_changed(&self, parameters: &SynthParameters);

    /// Called when an engine instance was created or destroyed.
    fn on_handle_changed(&self, handle: &EngineHandle);

    /// Called when a command failed. The error is also returned to the caller.
    fn on_error(&self, error: &SynthError);
}
