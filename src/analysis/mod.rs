//! Chord analysis over the set of held notes.
//!
//! Runs entirely outside the audio thread: the input context keeps the
//! [`ActiveNotes`], and [`AnalysisExecutor`] names snapshots of it in the
//! background.

pub mod chord;
pub mod dispatch;
pub mod notes;

pub use chord::{analyze, chord_name, Chord, ChordQuality};
pub use dispatch::{AnalysisExecutor, ChordBoard, ChordReport, ChordSink, LogSink};
pub use notes::{ActiveNotes, NoteSet};
