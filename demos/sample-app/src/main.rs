mod synth_state;

use std::error::Error;
use std::fs;
use std::sync::Arc;

use wavetable_synth_core::{
    CommandDispatcher, EngineSession, FrequencySlider, LifecycleBinder, LifecycleSource,
    SynthCommand, SynthConfiguration, VolumeSlider, WavetableKind,
};
use wavetable_synth_engines::LoggingEngine;

use synth_state::ConsoleDelegate;

fn load_configuration() -> Result<SynthConfiguration, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            Ok(SynthConfiguration::from_json(&json)?)
        }
        None => Ok(SynthConfiguration::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_configuration()?;
    let frequency_slider = FrequencySlider::from_configuration(&config);
    let volume_slider = VolumeSlider::from_configuration(&config);

    let mut session = EngineSession::with_configuration(LoggingEngine::new(), config)?;
    let delegate = Arc::new(ConsoleDelegate::new(&session.parameters()));
    session.set_delegate(delegate.clone());
    let session = Arc::new(session);

    let lifecycle = LifecycleSource::new();
    LifecycleBinder::bind(&lifecycle, session.clone());
    let dispatcher = CommandDispatcher::spawn(session.clone())?;

    // App comes to the front.
    lifecycle.on_foreground()?;

    // User picks a shape, drags the sliders, presses play.
    for kind in WavetableKind::ALL {
        dispatcher.run(SynthCommand::SetWavetable(kind))?;
    }
    for position in [0.0, 0.25, 0.5] {
        let hz = frequency_slider.frequency_for_position(position);
        dispatcher.run(SynthCommand::SetFrequency(hz))?;
    }
    dispatcher.run(SynthCommand::SetVolume(volume_slider.volume_for_value(-80.0)))?;
    dispatcher.run(SynthCommand::TogglePlayback)?;

    // App goes to the background, then returns.
    lifecycle.on_background()?;
    lifecycle.on_foreground()?;
    dispatcher.run(SynthCommand::IsPlaying)?;

    // Out-of-range input is reported, not applied.
    if let Err(e) = dispatcher.run(SynthCommand::SetFrequency(10.0)) {
        log::warn!("{}", e);
    }

    lifecycle.on_background()?;
    drop(dispatcher);

    println!("diagnostics: {}", session.diagnostics().to_json());
    Ok(())
}
