use std::f64::consts::TAU;

use crate::{io::converter::phase_increment, TAIL_OFF_CUTOFF, TAIL_OFF_DECAY, VOICE_GAIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Available for allocation
    Sounding,  // Key held, full level
    Releasing, // Key released, tail-off decaying
}

/// A single sine voice.
///
/// Output per sample is `sin(phase) * level`, scaled by the tail-off factor
/// while releasing. The tail-off shrinks geometrically and the voice frees
/// itself once it drops to [`TAIL_OFF_CUTOFF`].
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    state: VoiceState,
    age: u64,
    sample_rate: f64,
    phase: f64,
    phase_increment: f64,
    level: f64,
    tail_off: f64,
}

impl Voice {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            note: 0,
            state: VoiceState::Idle,
            age: 0,
            sample_rate,
            phase: 0.0,
            phase_increment: 0.0,
            level: 0.0,
            tail_off: 0.0,
        }
    }

    /// Takes effect on the next note started.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Bind the voice to a note. `age` orders voices for stealing.
    pub fn start_note(&mut self, note: u8, velocity: f64, age: u64) {
        self.note = note;
        self.age = age;
        self.state = VoiceState::Sounding;
        self.phase = 0.0;
        self.phase_increment = phase_increment(note, self.sample_rate);
        self.level = velocity * VOICE_GAIN;
        self.tail_off = 0.0;
    }

    pub fn stop_note(&mut self, allow_tail_off: bool) {
        match (self.state, allow_tail_off) {
            (VoiceState::Idle, _) => {}
            (VoiceState::Sounding, true) => {
                self.state = VoiceState::Releasing;
                self.tail_off = 1.0;
            }
            // already tailing off, keep decaying from where it is
            (VoiceState::Releasing, true) => {}
            (_, false) => self.clear(),
        }
    }

    /// Add `num_frames` frames into an interleaved buffer starting at frame
    /// `start`. The same sample goes to every channel.
    pub fn render(&mut self, out: &mut [f32], channels: usize, start: usize, num_frames: usize) {
        if self.state == VoiceState::Idle || channels == 0 {
            return;
        }

        for frame in start..start + num_frames {
            let sample = (self.phase.sin() * self.gain()) as f32;
            let base = frame * channels;
            for slot in &mut out[base..base + channels] {
                *slot += sample;
            }

            self.phase += self.phase_increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }

            if self.state == VoiceState::Releasing {
                self.tail_off *= TAIL_OFF_DECAY;
                if self.tail_off <= TAIL_OFF_CUTOFF {
                    self.clear();
                    break;
                }
            }
        }
    }

    /// Amplitude the next sample will be scaled by.
    pub fn gain(&self) -> f64 {
        match self.state {
            VoiceState::Idle => 0.0,
            VoiceState::Sounding => self.level,
            VoiceState::Releasing => self.level * self.tail_off,
        }
    }

    fn clear(&mut self) {
        self.state = VoiceState::Idle;
        self.phase_increment = 0.0;
        self.tail_off = 0.0;
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    /// Sounding with the key still down for `note`.
    pub fn is_playing(&self, note: u8) -> bool {
        self.state == VoiceState::Sounding && self.note == note
    }

    pub fn note(&self) -> Option<u8> {
        (!self.is_idle()).then_some(self.note)
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}
