// Purpose: the MIDI-input context, one port per device feeding a single note tracker

pub mod hub;

pub use hub::{InputPort, MidiInputHub};
