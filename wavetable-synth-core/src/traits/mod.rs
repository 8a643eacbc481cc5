pub mod engine_backend;
pub mod synth_delegate;
pub mod wavetable_synthesizer;
