//! Held-note bookkeeping.
//!
//! [`NoteSet`] is a 128-bit membership set over MIDI note numbers. It is
//! `Copy`, so handing a snapshot to another thread is a plain copy with no
//! allocation and no shared state.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::io::midi::MidiEvent;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoteSet(u128);

impl NoteSet {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns false if the note was already present or is above 127.
    pub fn insert(&mut self, note: u8) -> bool {
        if note > 127 {
            return false;
        }
        let bit = 1u128 << note;
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    pub fn remove(&mut self, note: u8) -> bool {
        if note > 127 {
            return false;
        }
        let bit = 1u128 << note;
        let removed = self.0 & bit != 0;
        self.0 &= !bit;
        removed
    }

    pub fn contains(&self, note: u8) -> bool {
        note <= 127 && self.0 & (1u128 << note) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn lowest(&self) -> Option<u8> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as u8)
    }

    /// Notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let bits = self.0;
        (0..=127u8).filter(move |&note| bits & (1u128 << note) != 0)
    }
}

impl FromIterator<u8> for NoteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = NoteSet::new();
        for note in iter {
            set.insert(note);
        }
        set
    }
}

impl fmt::Debug for NoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The set of keys currently held, as seen by the MIDI input context.
///
/// Owned by exactly one thread. Everyone else works from
/// [`snapshot`](ActiveNotes::snapshot) copies.
#[derive(Debug, Default)]
pub struct ActiveNotes {
    notes: NoteSet,
}

impl ActiveNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert on note-on, erase on note-off.
    ///
    /// Returns true for every note event, whether or not membership changed,
    /// so a repeated key still triggers a fresh analysis.
    pub fn apply(&mut self, event: MidiEvent) -> bool {
        match event {
            MidiEvent::NoteOn { note, .. } => {
                self.notes.insert(note);
            }
            MidiEvent::NoteOff { note, .. } => {
                self.notes.remove(note);
            }
        }
        true
    }

    pub fn snapshot(&self) -> NoteSet {
        self.notes
    }
}
