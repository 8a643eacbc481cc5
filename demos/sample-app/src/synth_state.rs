use parking_lot::Mutex;
use serde::Serialize;

use wavetable_synth_core::{
    frequency_label, EngineHandle, SynthDelegate, SynthError, SynthParameters,
};

/// What the UI would render, derived from session notifications.
#[derive(Clone, Default, Serialize)]
pub struct DisplayState {
    pub frequency_label: String,
    pub volume_db: f32,
    pub wavetable: String,
    pub play_button: String,
    pub engine_active: bool,
    pub last_error: Option<String>,
}

/// SynthDelegate that keeps a `DisplayState` up to date and prints it.
pub struct ConsoleDelegate {
    display: Mutex<DisplayState>,
}

impl ConsoleDelegate {
    pub fn new(initial: &SynthParameters) -> Self {
        let delegate = Self {
            display: Mutex::new(DisplayState::default()),
        };
        delegate.apply(initial);
        delegate
    }

    pub fn snapshot(&self) -> DisplayState {
        self.display.lock().clone()
    }

    fn apply(&self, parameters: &SynthParameters) {
        let mut display = self.display.lock();
        display.frequency_label = frequency_label(parameters.frequency_hz);
        display.volume_db = parameters.volume_db;
        display.wavetable = parameters.wavetable.label_key().to_string();
        display.play_button = parameters.transport.label().to_string();
    }

    fn print(&self) {
        let display = self.snapshot();
        match serde_json::to_string(&display) {
            Ok(json) => println!("ui: {}", json),
            Err(e) => log::error!("Failed to serialize display state: {}", e),
        }
    }
}

impl SynthDelegate for ConsoleDelegate {
    fn on_parameters_changed(&self, parameters: &SynthParameters) {
        self.apply(parameters);
        self.print();
    }

    fn on_handle_changed(&self, handle: &EngineHandle) {
        self.display.lock().engine_active = handle.is_active();
        self.print();
    }

    fn on_error(&self, error: &SynthError) {
        self.display.lock().last_error = Some(error.to_string());
        self.print();
    }
}
