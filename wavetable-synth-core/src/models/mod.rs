pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parameters;
pub mod state;
pub mod wavetable;
