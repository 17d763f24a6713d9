//! Full engine blocks with events arriving mid-block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polychord::{
    engine::{EngineConfig, RenderEngine},
    io::{event_collector, MidiEvent, ScheduledEvent},
};

use crate::BLOCK_SIZES;

const CHORD: [u8; 8] = [48, 52, 55, 59, 60, 64, 67, 71];

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = EngineConfig::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === HELD CHORD ===
        // eight voices sounding, no events
        let (tx, rx) = event_collector(config.collector_capacity, 48_000.0).unwrap();
        let mut held = RenderEngine::new(&config, rx).unwrap();
        for note in CHORD {
            tx.push(MidiEvent::note_on(note, 100));
        }
        held.render(&mut buffer, 2);

        group.bench_with_input(BenchmarkId::new("held_chord", size), &size, |b, _| {
            b.iter(|| {
                held.render(black_box(&mut buffer), 2);
            })
        });

        // === RESTRUCK CHORD ===
        // the whole chord released and struck again every block through
        // the collector
        let (tx, rx) = event_collector(config.collector_capacity, 48_000.0).unwrap();
        let mut restruck = RenderEngine::new(&config, rx).unwrap();

        group.bench_with_input(BenchmarkId::new("restruck_chord", size), &size, |b, _| {
            b.iter(|| {
                for note in CHORD {
                    tx.push(MidiEvent::note_off(note));
                    tx.push(MidiEvent::note_on(note, 100));
                }
                restruck.render(black_box(&mut buffer), 2);
            })
        });

        // === SCHEDULED ARPEGGIO ===
        // pre-timed events through a ring buffer, spread across the block
        let (mut producer, consumer) = rtrb::RingBuffer::<ScheduledEvent>::new(64);
        let mut arpeggio = RenderEngine::new(&config, consumer).unwrap();
        let step = (size / CHORD.len()) as u32;

        group.bench_with_input(BenchmarkId::new("scheduled_arpeggio", size), &size, |b, _| {
            b.iter(|| {
                for (i, note) in CHORD.into_iter().enumerate() {
                    let offset = i as u32 * step;
                    let _ = producer.push(ScheduledEvent::new(MidiEvent::note_on(note, 90), offset));
                }
                arpeggio.render(black_box(&mut buffer), 2);
            })
        });
    }

    group.finish();
}
