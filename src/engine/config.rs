#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Error, io::collector::DEFAULT_CAPACITY, synth::VoiceStealing, Result};

/// Engine settings that are decided at startup.
///
/// The musical constants (polyphony, gain, tail-off) are fixed crate-wide;
/// this only covers what depends on the host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz. Replaced by the device rate on prepare.
    pub sample_rate: f32,
    /// Preferred frames per device callback.
    pub block_size: usize,
    /// Events held between two audio callbacks before the oldest is dropped.
    pub collector_capacity: usize,
    pub voice_stealing: VoiceStealing,
    /// Background threads running chord analysis.
    pub analysis_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: 256,
            collector_capacity: DEFAULT_CAPACITY,
            voice_stealing: VoiceStealing::Oldest,
            analysis_workers: 1,
        }
    }
}

impl EngineConfig {
    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn collector_capacity(mut self, capacity: usize) -> Self {
        self.collector_capacity = capacity;
        self
    }

    pub fn voice_stealing(mut self, stealing: VoiceStealing) -> Self {
        self.voice_stealing = stealing;
        self
    }

    pub fn analysis_workers(mut self, workers: usize) -> Self {
        self.analysis_workers = workers;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        if self.collector_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if self.analysis_workers == 0 {
            return Err(Error::NoAnalysisWorkers);
        }
        Ok(())
    }
}

pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSampleRate(sample_rate))
    }
}
