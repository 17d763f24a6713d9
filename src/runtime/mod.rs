//! One-call wiring of the whole instrument.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use polychord::{analysis::LogSink, engine::EngineConfig, runtime::Instrument};
//!
//! let Instrument { mut engine, input } =
//!     Instrument::new(&EngineConfig::default(), Arc::new(LogSink))?;
//!
//! let keys = input.open_port("keys");
//! keys.receive_bytes(&[0x90, 60, 100]);
//!
//! // audio callback
//! engine.render(&mut buffer, channels);
//! ```

use std::sync::Arc;

use crate::{
    analysis::{AnalysisExecutor, ChordSink},
    engine::{EngineConfig, RenderEngine},
    input::MidiInputHub,
    io::collector::event_collector,
    Result,
};

/// The audio-thread half and the input half of one instrument.
///
/// `engine` moves into the audio callback; `input` stays with whoever
/// manages MIDI connections.
pub struct Instrument {
    pub engine: RenderEngine,
    pub input: MidiInputHub,
}

impl Instrument {
    pub fn new(config: &EngineConfig, sink: Arc<dyn ChordSink>) -> Result<Self> {
        config.validate()?;

        let (sender, receiver) =
            event_collector(config.collector_capacity, config.sample_rate as f64)?;
        let engine = RenderEngine::new(config, receiver)?;
        let executor = AnalysisExecutor::new(config.analysis_workers, sink)?;
        let input = MidiInputHub::spawn(sender, executor)?;

        Ok(Self { engine, input })
    }
}
