/// Equal-tempered frequency of a MIDI note, A4 (note 69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}

/// Phase advance per sample, in radians, for a note at the given rate.
pub fn phase_increment(note: u8, sample_rate: f64) -> f64 {
    std::f64::consts::TAU * midi_note_to_freq(note) / sample_rate
}
