pub mod analysis; // Chord naming over held notes
pub mod engine;
pub mod error;
pub mod input; // MIDI-input context: note tracking and fan-out
pub mod io;
pub mod runtime;
pub mod synth; // Voices and polyphony

pub use error::{Error, Result};

/// Number of voices in the pool.
pub const POLYPHONY: usize = 8;
/// Per-voice gain at full velocity. Eight voices summed stay inside [-1, 1].
pub const VOICE_GAIN: f64 = 0.15;
/// Tail-off multiplier applied every sample while a voice is releasing.
pub const TAIL_OFF_DECAY: f64 = 0.99;
/// Tail-off level at or below which a releasing voice goes idle.
pub const TAIL_OFF_CUTOFF: f64 = 0.005;
/// Fewest held notes the analyzer will try to name.
pub const MIN_CHORD_NOTES: usize = 3;
