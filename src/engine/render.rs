use crate::{
    engine::config::{check_sample_rate, EngineConfig},
    io::collector::{EventBlock, EventReceiver},
    synth::{EventSource, VoicePool},
    Result,
};

/// Audio-thread side of the instrument.
///
/// Each [`render`](RenderEngine::render) drains the event source, then walks
/// the block: voices are rendered up to the next event's offset, the event is
/// applied, and rendering resumes from there. Nothing here allocates or locks
/// once constructed.
pub struct RenderEngine<S = EventReceiver> {
    pool: VoicePool,
    source: S,
    pending: EventBlock,
    sample_rate: f64,
}

impl<S: EventSource> RenderEngine<S> {
    pub fn new(config: &EngineConfig, source: S) -> Result<Self> {
        config.validate()?;
        let sample_rate = config.sample_rate as f64;

        Ok(Self {
            pool: VoicePool::new(sample_rate, config.voice_stealing),
            source,
            pending: EventBlock::with_capacity(config.collector_capacity),
            sample_rate,
        })
    }

    /// Adopt the device sample rate and drop stale input.
    pub fn prepare(&mut self, sample_rate: f32) -> Result<()> {
        check_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate as f64;
        self.pool.set_sample_rate(self.sample_rate);
        self.source.reset(self.sample_rate);
        Ok(())
    }

    /// Overwrite an interleaved buffer of `channels` channels with the next
    /// block. With zero channels nothing is written but events still apply.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        let num_frames = if channels == 0 { 0 } else { out.len() / channels };

        self.pending.clear();
        self.source.drain_into(num_frames, &mut self.pending);

        let mut cursor = 0;
        for scheduled in self.pending.iter() {
            let offset = (scheduled.offset as usize).min(num_frames);
            if offset > cursor {
                self.pool.render(out, channels, cursor, offset - cursor);
                cursor = offset;
            }
            self.pool.handle_event(scheduled.event);
        }

        if num_frames > cursor {
            self.pool.render(out, channels, cursor, num_frames - cursor);
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        self.pool.all_notes_off(allow_tail_off);
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
