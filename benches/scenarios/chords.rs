use std::hint::black_box;

use criterion::Criterion;
use polychord::analysis::{analyze, chord_name, NoteSet};

pub fn bench_chords(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chords");

    let voicings: Vec<NoteSet> = [
        &[60u8, 64, 67][..],
        &[36, 63, 70, 103],
        &[57, 60, 64, 67, 72, 76],
        &[60, 63, 66],
        &[21, 50, 79, 108],
    ]
    .iter()
    .map(|notes| notes.iter().copied().collect())
    .collect();

    group.bench_function("analyze", |b| {
        b.iter(|| {
            for notes in &voicings {
                black_box(analyze(black_box(notes)));
            }
        })
    });

    group.bench_function("chord_name", |b| {
        b.iter(|| {
            for notes in &voicings {
                black_box(chord_name(black_box(notes)));
            }
        })
    });

    group.finish();
}
