//! Error type for setting up the engine and its background workers.
//!
//! Nothing on the render, input or analysis paths returns an error; only
//! construction and configuration can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("event collector capacity must be at least 1")]
    ZeroCapacity,

    #[error("analysis executor needs at least one worker")]
    NoAnalysisWorkers,

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
