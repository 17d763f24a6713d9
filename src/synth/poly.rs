#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    io::midi::MidiEvent,
    synth::voice::{Voice, VoiceState},
    POLYPHONY,
};

/// What to do with a note-on when every voice is busy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStealing {
    /// Take the oldest releasing voice, else the oldest sounding one.
    #[default]
    Oldest,
    /// Ignore the note-on.
    Drop,
}

/// Fixed set of [`POLYPHONY`] voices.
///
/// Allocation order: the lowest-index idle voice, then (with
/// [`VoiceStealing::Oldest`]) the releasing voice started longest ago, then
/// the sounding voice started longest ago. A stolen voice is cut without
/// tail-off and restarted. Age is a note-on counter, so ties cannot happen.
pub struct VoicePool {
    voices: [Voice; POLYPHONY],
    stealing: VoiceStealing,
    note_counter: u64,
}

impl VoicePool {
    pub fn new(sample_rate: f64, stealing: VoiceStealing) -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new(sample_rate)),
            stealing,
            note_counter: 0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    pub fn handle_event(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn { note, .. } => {
                self.note_on(note, event.velocity_normalized());
            }
            MidiEvent::NoteOff { note, .. } => self.note_off(note, true),
        }
    }

    /// Start `note`, returning the index of the voice that took it.
    pub fn note_on(&mut self, note: u8, velocity: f64) -> Option<usize> {
        // Retriggering a held key releases the old voice first
        for voice in &mut self.voices {
            if voice.is_playing(note) {
                voice.stop_note(true);
            }
        }

        let idx = self.allocate_voice()?;
        let age = self.note_counter;
        self.note_counter += 1;

        let voice = &mut self.voices[idx];
        if !voice.is_idle() {
            voice.stop_note(false);
        }
        voice.start_note(note, velocity, age);
        Some(idx)
    }

    /// Release the voice holding `note`. No-op when nothing is.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        if let Some(voice) = self.voices.iter_mut().find(|v| v.is_playing(note)) {
            voice.stop_note(allow_tail_off);
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            voice.stop_note(allow_tail_off);
        }
    }

    /// Sum every active voice into `out` over frames `start..start + num_frames`.
    pub fn render(&mut self, out: &mut [f32], channels: usize, start: usize, num_frames: usize) {
        for voice in &mut self.voices {
            voice.render(out, channels, start, num_frames);
        }
    }

    fn allocate_voice(&self) -> Option<usize> {
        if let Some(idx) = self.voices.iter().position(Voice::is_idle) {
            return Some(idx);
        }

        match self.stealing {
            VoiceStealing::Drop => None,
            VoiceStealing::Oldest => self
                .oldest_in(VoiceState::Releasing)
                .or_else(|| self.oldest_in(VoiceState::Sounding)),
        }
    }

    fn oldest_in(&self, state: VoiceState) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == state)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_idle()).count()
    }
}
