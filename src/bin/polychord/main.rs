//! polychord - sine synth on every MIDI input, logging the chord being held
//!
//! Run with: cargo run -- [--port <name>] [--buffer-size 256]

mod audio;
mod midi;

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use polychord::{analysis::LogSink, engine::EngineConfig, runtime::Instrument};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "polychord", version, about = "Polyphonic MIDI sine synth with chord naming")]
struct Args {
    /// Print the available MIDI inputs and exit
    #[arg(short, long)]
    list: bool,

    /// Only enable inputs whose name contains this text (repeatable)
    #[arg(short, long = "port")]
    ports: Vec<String>,

    /// Frames per audio callback to request from the device
    #[arg(short, long, default_value_t = 256)]
    buffer_size: u32,

    /// Chord analysis worker threads
    #[arg(short, long, default_value_t = 1)]
    workers: usize,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.list {
        for name in midi::input_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let config = EngineConfig::default()
        .block_size(args.buffer_size as usize)
        .analysis_workers(args.workers);
    let Instrument { engine, input } =
        Instrument::new(&config, Arc::new(LogSink)).wrap_err("failed to build instrument")?;

    let stream = audio::start(engine, &config)?;
    let connections = midi::connect_inputs(&input, &args.ports)?;
    if connections.is_empty() {
        warn!("no MIDI inputs enabled, output stays silent");
    }

    println!("Playing... press Enter to quit");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("failed to read stdin")?;

    // stop callbacks before the hub goes away
    drop(connections);
    drop(stream);

    let dropped = input.dropped_events();
    let held = input.shutdown().snapshot();
    info!(held = ?held, dropped, "stopped");
    Ok(())
}
