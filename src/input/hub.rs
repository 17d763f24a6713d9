//! MIDI input hub
//!
//! Each connected device gets an [`InputPort`]. Its callback pushes the event
//! straight into the event collector for the audio thread, then forwards it
//! to the hub thread. The hub thread is the only writer of [`ActiveNotes`]:
//! it applies events in the order each port sent them, publishes a snapshot
//! for lock-free readers, and submits the snapshot for chord analysis.
//!
//! Nothing on the port side blocks: the collector overwrites on overflow and
//! the hub channel is unbounded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, trace};

use crate::{
    analysis::{dispatch::AnalysisExecutor, notes::ActiveNotes, notes::NoteSet},
    error::Error,
    io::{collector::EventSender, midi::MidiEvent},
    Result,
};

enum HubMessage {
    Event { port: usize, event: MidiEvent },
    Shutdown,
}

/// Handle for one input device. Cheap to clone; all clones share the port id.
#[derive(Clone)]
pub struct InputPort {
    id: usize,
    name: Arc<str>,
    collector: EventSender,
    hub: Sender<HubMessage>,
}

impl InputPort {
    /// Hand an event to both the audio thread and the note tracker.
    pub fn receive(&self, event: MidiEvent) {
        self.collector.push(event);
        // only fails once the hub has shut down; nothing left to update then
        let _ = self.hub.send(HubMessage::Event {
            port: self.id,
            event,
        });
    }

    /// Parse and forward a raw message. Returns false for anything that is
    /// not a note-on or note-off.
    pub fn receive_bytes(&self, bytes: &[u8]) -> bool {
        match MidiEvent::from_bytes(bytes) {
            Some(event) => {
                self.receive(event);
                true
            }
            None => false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owner of the note-tracking thread.
pub struct MidiInputHub {
    tx: Sender<HubMessage>,
    collector: EventSender,
    snapshot: Arc<ArcSwap<NoteSet>>,
    worker: Option<JoinHandle<ActiveNotes>>,
    next_port: AtomicUsize,
}

impl MidiInputHub {
    /// Start the hub thread. It takes ownership of the analysis executor,
    /// which is shut down together with the hub.
    pub fn spawn(collector: EventSender, executor: AnalysisExecutor) -> Result<Self> {
        let (tx, rx) = unbounded();
        let snapshot = Arc::new(ArcSwap::from_pointee(NoteSet::new()));

        let published = Arc::clone(&snapshot);
        let worker = thread::Builder::new()
            .name("midi-input-hub".into())
            .spawn(move || Self::run(rx, published, executor))
            .map_err(|source| Error::Spawn {
                name: "midi input hub",
                source,
            })?;

        Ok(Self {
            tx,
            collector,
            snapshot,
            worker: Some(worker),
            next_port: AtomicUsize::new(0),
        })
    }

    fn run(
        rx: Receiver<HubMessage>,
        published: Arc<ArcSwap<NoteSet>>,
        mut executor: AnalysisExecutor,
    ) -> ActiveNotes {
        let mut active = ActiveNotes::new();

        for message in rx {
            match message {
                HubMessage::Event { port, event } => {
                    trace!(port, ?event, "note event");
                    if active.apply(event) {
                        let notes = active.snapshot();
                        published.store(Arc::new(notes));
                        executor.submit(notes);
                    }
                }
                HubMessage::Shutdown => break,
            }
        }

        debug!(held = active.snapshot().len(), "midi input hub stopped");
        active
    }

    /// Register a device and get the handle its callback should use.
    pub fn open_port(&self, name: impl Into<String>) -> InputPort {
        let id = self.next_port.fetch_add(1, Ordering::Relaxed);
        let name: Arc<str> = name.into().into();
        debug!(port = id, name = %name, "opened midi input port");

        InputPort {
            id,
            name,
            collector: self.collector.clone(),
            hub: self.tx.clone(),
        }
    }

    /// Point-in-time copy of the held notes as last applied by the hub.
    pub fn snapshot(&self) -> NoteSet {
        **self.snapshot.load()
    }

    /// Events the audio side lost to collector overflow.
    pub fn dropped_events(&self) -> u64 {
        self.collector.dropped()
    }

    /// Apply everything sent so far, stop the hub and the analysis workers,
    /// and return the final note state.
    pub fn shutdown(mut self) -> ActiveNotes {
        self.stop().unwrap_or_default()
    }

    fn stop(&mut self) -> Option<ActiveNotes> {
        let worker = self.worker.take()?;
        let _ = self.tx.send(HubMessage::Shutdown);
        worker.join().ok()
    }
}

impl Drop for MidiInputHub {
    fn drop(&mut self) {
        self.stop();
    }
}
