//! Default output device setup

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, Stream, StreamConfig, SupportedBufferSize};
use tracing::{error, info};

use polychord::engine::{EngineConfig, RenderEngine};

/// Open the default output and move `engine` into its callback.
///
/// Asks for `config.block_size` frames per callback when the device allows
/// it, otherwise takes the device default.
pub fn start(mut engine: RenderEngine, config: &EngineConfig) -> EyreResult<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    if supported.sample_format() != SampleFormat::F32 {
        bail!(
            "output device uses {:?} samples, only f32 is supported",
            supported.sample_format()
        );
    }

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    let requested = config.block_size as u32;
    let buffer_size = match supported.buffer_size() {
        SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&requested) => {
            BufferSize::Fixed(requested)
        }
        _ => BufferSize::Default,
    };

    let mut stream_config: StreamConfig = supported.into();
    stream_config.buffer_size = buffer_size;

    engine
        .prepare(sample_rate)
        .wrap_err("device reported an unusable sample rate")?;

    let device_name = device.name().unwrap_or_else(|_| "unknown".into());
    info!(
        device = %device_name,
        sample_rate,
        channels,
        buffer_size = ?stream_config.buffer_size,
        "audio output ready"
    );

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _| engine.render(data, channels),
            |err| error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    Ok(stream)
}
