//! Scenario benchmarks: what the audio callback and the analysis workers
//! actually do while someone is playing.

mod chords;
mod voices;

pub use chords::bench_chords;
pub use voices::bench_voices;
