//! Event collector - MIDI input callbacks to the audio thread
//!
//! Any number of input callbacks push timestamped events through cloned
//! [`EventSender`]s. The audio thread owns the single [`EventReceiver`] and,
//! once per block, drains everything that arrived since the previous block
//! into a preallocated [`EventBlock`], turning arrival times into sample
//! offsets inside the block it is about to render.
//!
//! The queue is bounded. When it is full the oldest unread event is
//! overwritten so producers never wait on the audio thread; the number of
//! events lost this way is counted and exposed via [`EventSender::dropped`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_queue::ArrayQueue;
use tracing::debug;

use crate::{error::Error, io::midi::MidiEvent, Result};

/// Default number of events the queue holds between two drains.
pub const DEFAULT_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy)]
struct StampedEvent {
    event: MidiEvent,
    arrival: u64,
    at: Instant,
}

/// An event placed at a sample offset inside the block being rendered.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub event: MidiEvent,
    /// Frame index inside the block, `0..num_frames`
    pub offset: u32,
    /// Collector-wide arrival sequence number
    pub arrival: u64,
}

impl ScheduledEvent {
    pub fn new(event: MidiEvent, offset: u32) -> Self {
        Self {
            event,
            offset,
            arrival: 0,
        }
    }
}

struct Shared {
    queue: ArrayQueue<StampedEvent>,
    arrivals: AtomicU64,
    dropped: AtomicU64,
}

/// Create a collector holding at most `capacity` undrained events.
pub fn event_collector(capacity: usize, sample_rate: f64) -> Result<(EventSender, EventReceiver)> {
    if capacity == 0 {
        return Err(Error::ZeroCapacity);
    }

    let shared = Arc::new(Shared {
        queue: ArrayQueue::new(capacity),
        arrivals: AtomicU64::new(0),
        dropped: AtomicU64::new(0),
    });

    let sender = EventSender {
        shared: Arc::clone(&shared),
    };
    let receiver = EventReceiver {
        shared,
        sample_rate,
        last_drain: Instant::now(),
    };
    Ok((sender, receiver))
}

/// Producer side. Cheap to clone, one per input device is typical.
#[derive(Clone)]
pub struct EventSender {
    shared: Arc<Shared>,
}

impl EventSender {
    /// Queue an event stamped with the current time. Never blocks.
    pub fn push(&self, event: MidiEvent) {
        self.push_at(event, Instant::now());
    }

    /// Queue an event with an explicit arrival time.
    pub fn push_at(&self, event: MidiEvent, at: Instant) {
        let arrival = self.shared.arrivals.fetch_add(1, Ordering::Relaxed);
        let stamped = StampedEvent { event, arrival, at };

        if let Some(lost) = self.shared.queue.force_push(stamped) {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(
                arrival = lost.arrival,
                "event collector full, dropped oldest event"
            );
        }
    }

    /// Events overwritten because the audio thread fell behind.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }
}

/// Consumer side, owned by the audio thread.
pub struct EventReceiver {
    shared: Arc<Shared>,
    sample_rate: f64,
    last_drain: Instant,
}

impl EventReceiver {
    /// Discard anything pending and restart the timing window.
    ///
    /// Call when the audio device (re)starts, before the first block.
    pub fn reset(&mut self, sample_rate: f64) {
        self.reset_at(sample_rate, Instant::now());
    }

    pub fn reset_at(&mut self, sample_rate: f64, now: Instant) {
        while self.shared.queue.pop().is_some() {}
        self.sample_rate = sample_rate;
        self.last_drain = now;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Move everything queued since the previous drain into `block`.
    pub fn drain(&mut self, num_frames: usize, block: &mut EventBlock) {
        self.drain_at(Instant::now(), num_frames, block);
    }

    /// Drain as if the block starts at `now`.
    ///
    /// The wall-clock window since the last drain is measured in samples
    /// (`window`). If the window fits inside the block, events keep their
    /// spacing and are right-aligned so the latest lands near the block end;
    /// a longer window is compressed onto the block. Offsets never go
    /// backwards, so arrival order is also dispatch order. Events that do not
    /// fit in `block` stay queued for the next drain.
    pub fn drain_at(&mut self, now: Instant, num_frames: usize, block: &mut EventBlock) {
        let elapsed = now.saturating_duration_since(self.last_drain);
        let window = ((elapsed.as_secs_f64() * self.sample_rate).round() as usize).max(1);
        let mut floor = 0usize;

        while !block.is_full() {
            let Some(stamped) = self.shared.queue.pop() else {
                break;
            };

            let offset = if num_frames == 0 {
                0
            } else {
                let since = stamped.at.saturating_duration_since(self.last_drain);
                let position =
                    ((since.as_secs_f64() * self.sample_rate).round() as usize).min(window - 1);

                let mapped = if window <= num_frames {
                    num_frames - window + position
                } else {
                    position * num_frames / window
                };
                mapped.min(num_frames - 1).max(floor)
            };
            floor = offset;

            block.push(ScheduledEvent {
                event: stamped.event,
                offset: offset as u32,
                arrival: stamped.arrival,
            });
        }

        self.last_drain = now;
    }
}

/// Fixed-capacity list of events for one render block.
///
/// Allocated once up front; pushing past the capacity is refused rather than
/// growing, so filling it on the audio thread never allocates.
#[derive(Debug)]
pub struct EventBlock {
    events: Vec<ScheduledEvent>,
    limit: usize,
}

impl EventBlock {
    pub fn with_capacity(limit: usize) -> Self {
        Self {
            events: Vec::with_capacity(limit),
            limit,
        }
    }

    pub fn capacity(&self) -> usize {
        self.limit
    }

    pub fn push(&mut self, event: ScheduledEvent) -> bool {
        if self.is_full() {
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= self.limit
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[ScheduledEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    const SR: f64 = 48_000.0;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(event_collector(0, SR), Err(Error::ZeroCapacity)));
    }

    #[test]
    fn overflow_drops_oldest() {
        let (tx, mut rx) = event_collector(4, SR).unwrap();
        for note in 60..66 {
            tx.push(MidiEvent::note_on(note, 100));
        }
        assert_eq!(tx.dropped(), 2);

        let mut block = EventBlock::with_capacity(16);
        rx.drain(256, &mut block);
        let notes: Vec<u8> = block.iter().map(|e| e.event.note()).collect();
        assert_eq!(notes, vec![62, 63, 64, 65]);
    }

    #[test]
    fn short_window_is_right_aligned() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        let t0 = Instant::now();
        rx.reset_at(SR, t0);

        // 1 ms = 48 samples into a 10 ms (480 sample) window, 512 frame block
        tx.push_at(MidiEvent::note_on(60, 100), t0 + Duration::from_millis(1));
        let mut block = EventBlock::with_capacity(8);
        rx.drain_at(t0 + Duration::from_millis(10), 512, &mut block);

        assert_eq!(block.len(), 1);
        assert_eq!(block.as_slice()[0].offset, 512 - 480 + 48);
    }

    #[test]
    fn long_window_is_compressed() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        let t0 = Instant::now();
        rx.reset_at(SR, t0);

        // halfway through a 960 sample window lands halfway through 480 frames
        tx.push_at(MidiEvent::note_on(60, 100), t0 + Duration::from_millis(10));
        let mut block = EventBlock::with_capacity(8);
        rx.drain_at(t0 + Duration::from_millis(20), 480, &mut block);

        assert_eq!(block.as_slice()[0].offset, 240);
    }

    #[test]
    fn offsets_follow_arrival_order() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        let t0 = Instant::now();
        rx.reset_at(SR, t0);

        // a second device stamped its event earlier but queued it later
        tx.push_at(MidiEvent::note_on(60, 100), t0 + Duration::from_millis(4));
        tx.push_at(MidiEvent::note_on(72, 100), t0 + Duration::from_millis(1));
        let mut block = EventBlock::with_capacity(8);
        rx.drain_at(t0 + Duration::from_millis(5), 256, &mut block);

        let events = block.as_slice();
        assert_eq!(events[0].event.note(), 60);
        assert_eq!(events[1].event.note(), 72);
        assert!(events[1].offset >= events[0].offset);
        assert!(events[0].arrival < events[1].arrival);
    }

    #[test]
    fn zero_frames_schedules_at_start() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        tx.push(MidiEvent::note_on(60, 100));
        let mut block = EventBlock::with_capacity(8);
        rx.drain(0, &mut block);
        assert_eq!(block.as_slice()[0].offset, 0);
    }

    #[test]
    fn full_block_leaves_rest_queued() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        for note in 60..65 {
            tx.push(MidiEvent::note_on(note, 100));
        }
        let mut block = EventBlock::with_capacity(3);
        rx.drain(128, &mut block);
        assert_eq!(block.len(), 3);
        assert_eq!(tx.pending(), 2);

        block.clear();
        rx.drain(128, &mut block);
        let notes: Vec<u8> = block.iter().map(|e| e.event.note()).collect();
        assert_eq!(notes, vec![63, 64]);
    }

    #[test]
    fn reset_discards_pending() {
        let (tx, mut rx) = event_collector(8, SR).unwrap();
        tx.push(MidiEvent::note_on(60, 100));
        rx.reset(44_100.0);
        assert_eq!(rx.sample_rate(), 44_100.0);

        let mut block = EventBlock::with_capacity(8);
        rx.drain(128, &mut block);
        assert!(block.is_empty());
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        const PRODUCERS: u8 = 4;
        const PER_PRODUCER: u8 = 100;

        let (tx, mut rx) = event_collector(1024, SR).unwrap();
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|device| {
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        tx.push(MidiEvent::note_on(device, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut block = EventBlock::with_capacity(1024);
        rx.drain(512, &mut block);
        assert_eq!(block.len(), PRODUCERS as usize * PER_PRODUCER as usize);
        assert_eq!(tx.dropped(), 0);

        // each device's events come out in the order it pushed them
        for device in 0..PRODUCERS {
            let velocities: Vec<u8> = block
                .iter()
                .filter(|e| e.event.note() == device)
                .map(|e| e.event.velocity())
                .collect();
            assert_eq!(velocities, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }
}
