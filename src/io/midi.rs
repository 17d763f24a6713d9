#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DATA_MASK: u8 = 0x7F;

/// A note message as received from a MIDI input.
///
/// Only note-on and note-off are modelled; everything else a device sends is
/// dropped at parse time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
}

impl MidiEvent {
    pub fn note_on(note: u8, velocity: u8) -> Self {
        MidiEvent::NoteOn {
            note: note & DATA_MASK,
            velocity: velocity & DATA_MASK,
        }
    }

    pub fn note_off(note: u8) -> Self {
        MidiEvent::NoteOff {
            note: note & DATA_MASK,
            velocity: 0,
        }
    }

    /// Parse a raw channel message.
    ///
    /// A note-on with velocity 0 is a note-off, as most keyboards send it.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if data.len() < 2 {
            return None;
        }
        let note = data[0] & DATA_MASK;
        let velocity = data[1] & DATA_MASK;

        match status & 0xF0 {
            0x90 if velocity > 0 => Some(MidiEvent::NoteOn { note, velocity }),
            0x90 => Some(MidiEvent::NoteOff { note, velocity: 0 }),
            0x80 => Some(MidiEvent::NoteOff { note, velocity }),
            _ => None,
        }
    }

    pub fn note(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { note, .. } | MidiEvent::NoteOff { note, .. } => note,
        }
    }

    pub fn velocity(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { velocity, .. } | MidiEvent::NoteOff { velocity, .. } => velocity,
        }
    }

    /// Velocity mapped onto 0.0..=1.0
    pub fn velocity_normalized(&self) -> f64 {
        self.velocity() as f64 / 127.0
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { .. })
    }
}
