/*
Chord Naming
============

The lowest held note is taken as the root. Every held note is reduced to its
interval above that root, modulo an octave, giving a set of pitch-class
intervals (0-11). Voicing, octave doubling and the order keys went down do
not matter; only the interval set and the bass pitch class do.

The interval set is matched against a short table, first match wins:

  contains   then                      name
  --------   ----                      ----
  {4, 7}     11 present                <root>M7       major seventh
             10 present                <root>7        dominant seventh
             otherwise                 <root> Major
  {3, 7}     10 present                <root>m7       minor seventh
             otherwise                 <root> Minor
  {3, 6}     9 present                 <root>dim7     diminished seventh
             10 present                <root>m7(b5)   half-diminished
             otherwise                 (falls through)
  anything else                        <root> (Unknown)

A bare diminished triad {3, 6} therefore reads as "(Unknown)". That is the
existing behavior of the table and is kept as-is.

Fewer than three held notes never name a chord.
*/

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{analysis::notes::NoteSet, MIN_CHORD_NOTES};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Major7,
    Dominant7,
    Minor7,
    Diminished7,
    HalfDiminished7,
    Unknown,
}

impl ChordQuality {
    /// Text appended to the root name.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => " Major",
            ChordQuality::Minor => " Minor",
            ChordQuality::Major7 => "M7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::HalfDiminished7 => "m7(b5)",
            ChordQuality::Unknown => " (Unknown)",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    /// Pitch class of the bass note, 0 = C
    pub root: u8,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn root_name(&self) -> &'static str {
        NOTE_NAMES[(self.root % 12) as usize]
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root_name(), self.quality.suffix())
    }
}

/// Intervals above the bass as a 12-bit mask.
#[derive(Clone, Copy)]
struct Intervals(u16);

impl Intervals {
    fn has(self, semitones: u8) -> bool {
        self.0 & (1 << semitones) != 0
    }

    fn has_all(self, semitones: &[u8]) -> bool {
        semitones.iter().all(|&s| self.has(s))
    }
}

/// Name the chord formed by `notes`, if there are enough of them.
pub fn analyze(notes: &NoteSet) -> Option<Chord> {
    if notes.len() < MIN_CHORD_NOTES {
        return None;
    }
    let bass = notes.lowest()?;

    let intervals = Intervals(
        notes
            .iter()
            .fold(0u16, |mask, note| mask | 1 << ((note - bass) % 12)),
    );

    Some(Chord {
        root: bass % 12,
        quality: classify(intervals),
    })
}

fn classify(intervals: Intervals) -> ChordQuality {
    if intervals.has_all(&[4, 7]) {
        if intervals.has(11) {
            return ChordQuality::Major7;
        }
        if intervals.has(10) {
            return ChordQuality::Dominant7;
        }
        return ChordQuality::Major;
    }

    if intervals.has_all(&[3, 7]) {
        if intervals.has(10) {
            return ChordQuality::Minor7;
        }
        return ChordQuality::Minor;
    }

    if intervals.has_all(&[3, 6]) {
        if intervals.has(9) {
            return ChordQuality::Diminished7;
        }
        if intervals.has(10) {
            return ChordQuality::HalfDiminished7;
        }
    }

    ChordQuality::Unknown
}

/// [`analyze`] rendered as text, empty when there is no chord.
pub fn chord_name(notes: &NoteSet) -> String {
    analyze(notes).map(|chord| chord.to_string()).unwrap_or_default()
}
