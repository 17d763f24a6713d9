use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polychord::{
    synth::{Voice, VoicePool, VoiceStealing},
    POLYPHONY,
};

use crate::BLOCK_SIZES;

const SR: f64 = 48_000.0;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/voice");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];
        let mut voice = Voice::new(SR);
        voice.start_note(69, 1.0, 0);

        group.bench_with_input(BenchmarkId::new("sounding", size), &size, |b, &size| {
            b.iter(|| {
                voice.render(black_box(&mut buffer), 2, 0, size);
            })
        });

        // restarted every iteration so the tail never runs out
        let mut releasing = Voice::new(SR);
        group.bench_with_input(BenchmarkId::new("releasing", size), &size, |b, &size| {
            b.iter(|| {
                releasing.start_note(69, 1.0, 0);
                releasing.stop_note(true);
                releasing.render(black_box(&mut buffer), 2, 0, size);
            })
        });
    }

    group.finish();
}

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/pool");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        let mut pool = VoicePool::new(SR, VoiceStealing::Oldest);
        for note in 60..60 + POLYPHONY as u8 {
            pool.note_on(note, 0.8);
        }
        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, &size| {
            b.iter(|| {
                buffer.fill(0.0);
                pool.render(black_box(&mut buffer), 2, 0, size);
            })
        });

        // every note-on past the eighth has to steal
        let mut stealing = VoicePool::new(SR, VoiceStealing::Oldest);
        let mut note = 0u8;
        group.bench_with_input(BenchmarkId::new("stealing", size), &size, |b, &size| {
            b.iter(|| {
                note = (note + 1) % 128;
                stealing.note_on(black_box(note), 0.8);
                stealing.render(black_box(&mut buffer), 2, 0, size);
            })
        });
    }

    group.finish();
}
