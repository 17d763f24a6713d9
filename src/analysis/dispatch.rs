//! Background chord analysis
//!
//! The input context submits note-set snapshots; a small pool of worker
//! threads names them and publishes the results. Workers can finish out of
//! order, so every task carries its submission number and the
//! [`ChordBoard`] only accepts a result newer than the one it holds. Stale
//! results are simply discarded.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    analysis::{
        chord::{analyze, Chord},
        notes::NoteSet,
    },
    error::Error,
    Result,
};

/// A published analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChordReport {
    /// Submission number, starting at 1. Zero means nothing published yet.
    pub seq: u64,
    pub notes: NoteSet,
    pub chord: Option<Chord>,
}

impl ChordReport {
    /// Chord text, empty when nothing can be named.
    pub fn name(&self) -> String {
        self.chord.map(|c| c.to_string()).unwrap_or_default()
    }
}

/// Receives every report that wins publication, in submission order.
pub trait ChordSink: Send + Sync {
    fn report(&self, report: &ChordReport);
}

impl<F> ChordSink for F
where
    F: Fn(&ChordReport) + Send + Sync,
{
    fn report(&self, report: &ChordReport) {
        self(report)
    }
}

/// Logs the current voicing whenever a chord can be named.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ChordSink for LogSink {
    fn report(&self, report: &ChordReport) {
        if let Some(chord) = report.chord {
            info!(seq = report.seq, notes = ?report.notes, "current voicing: {chord}");
        }
    }
}

/// Latest-submission-wins publication point.
pub struct ChordBoard {
    latest: Mutex<ChordReport>,
    sink: Arc<dyn ChordSink>,
}

impl ChordBoard {
    pub fn new(sink: Arc<dyn ChordSink>) -> Self {
        Self {
            latest: Mutex::new(ChordReport::default()),
            sink,
        }
    }

    /// Returns false if a newer report was already published.
    pub fn publish(&self, report: ChordReport) -> bool {
        let mut latest = self.latest.lock();
        if report.seq <= latest.seq {
            debug!(seq = report.seq, newest = latest.seq, "discarding stale analysis");
            return false;
        }
        *latest = report;
        // under the lock so the sink sees reports in submission order
        self.sink.report(&report);
        true
    }

    pub fn latest(&self) -> ChordReport {
        *self.latest.lock()
    }
}

struct AnalysisTask {
    seq: u64,
    notes: NoteSet,
}

/// Worker pool running [`analyze`] off the audio and input paths.
///
/// Dropping the executor lets queued tasks finish, then joins the workers.
pub struct AnalysisExecutor {
    tx: Option<Sender<AnalysisTask>>,
    workers: Vec<JoinHandle<()>>,
    board: Arc<ChordBoard>,
    next_seq: u64,
}

impl AnalysisExecutor {
    pub fn new(workers: usize, sink: Arc<dyn ChordSink>) -> Result<Self> {
        if workers == 0 {
            return Err(Error::NoAnalysisWorkers);
        }

        let (tx, rx) = unbounded::<AnalysisTask>();
        let board = Arc::new(ChordBoard::new(sink));

        let mut executor = Self {
            tx: Some(tx),
            workers: Vec::with_capacity(workers),
            board,
            next_seq: 1,
        };

        for index in 0..workers {
            let rx = rx.clone();
            let board = Arc::clone(&executor.board);
            let handle = thread::Builder::new()
                .name(format!("chord-analysis-{index}"))
                .spawn(move || Self::worker(rx, board))
                .map_err(|source| Error::Spawn {
                    name: "chord analysis",
                    source,
                })?;
            executor.workers.push(handle);
        }

        Ok(executor)
    }

    fn worker(rx: Receiver<AnalysisTask>, board: Arc<ChordBoard>) {
        // ends once every sender is gone and the queue is empty
        for task in rx {
            board.publish(ChordReport {
                seq: task.seq,
                notes: task.notes,
                chord: analyze(&task.notes),
            });
        }
    }

    /// Queue a snapshot for analysis and return its submission number.
    pub fn submit(&mut self, notes: NoteSet) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(tx) = &self.tx {
            // workers only exit after the sender is dropped
            let _ = tx.send(AnalysisTask { seq, notes });
        }
        seq
    }

    pub fn board(&self) -> Arc<ChordBoard> {
        Arc::clone(&self.board)
    }

    pub fn latest(&self) -> ChordReport {
        self.board.latest()
    }
}

impl Drop for AnalysisExecutor {
    fn drop(&mut self) {
        self.tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting_sink() -> (Arc<Mutex<Vec<ChordReport>>>, Arc<dyn ChordSink>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: Arc<dyn ChordSink> = Arc::new(move |report: &ChordReport| {
            sink_seen.lock().push(*report);
        });
        (seen, sink)
    }

    fn notes(list: &[u8]) -> NoteSet {
        list.iter().copied().collect()
    }

    #[test]
    fn board_keeps_latest_submission() {
        let (seen, sink) = collecting_sink();
        let board = ChordBoard::new(sink);

        let newer = ChordReport {
            seq: 2,
            notes: notes(&[60, 63, 67]),
            chord: analyze(&notes(&[60, 63, 67])),
        };
        let older = ChordReport {
            seq: 1,
            notes: notes(&[60, 64, 67]),
            chord: analyze(&notes(&[60, 64, 67])),
        };

        assert!(board.publish(newer));
        assert!(!board.publish(older));
        assert_eq!(board.latest().name(), "C Minor");
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn executor_publishes_last_submission() {
        let (seen, sink) = collecting_sink();
        let mut executor = AnalysisExecutor::new(3, sink).unwrap();
        let board = executor.board();

        let mut held = NoteSet::new();
        let mut last = 0;
        for note in [60, 64, 67, 70] {
            held.insert(note);
            last = executor.submit(held);
        }
        drop(executor);

        let latest = board.latest();
        assert_eq!(latest.seq, last);
        assert_eq!(latest.name(), "C7");

        // whatever got through did so in increasing order
        let seqs: Vec<u64> = seen.lock().iter().map(|r| r.seq).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seqs.last(), Some(&last));
    }

    #[test]
    fn small_sets_report_empty_name() {
        let (_seen, sink) = collecting_sink();
        let mut executor = AnalysisExecutor::new(1, sink).unwrap();
        let board = executor.board();
        executor.submit(notes(&[60, 64]));
        drop(executor);

        assert_eq!(board.latest().chord, None);
        assert_eq!(board.latest().name(), "");
    }

    #[test]
    fn zero_workers_rejected() {
        let (_seen, sink) = collecting_sink();
        assert!(matches!(
            AnalysisExecutor::new(0, sink),
            Err(Error::NoAnalysisWorkers)
        ));
    }
}
