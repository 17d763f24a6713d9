//! MIDI device discovery and connection

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use midir::{MidiInput, MidiInputConnection};
use tracing::{info, warn};

use polychord::input::MidiInputHub;

const CLIENT_NAME: &str = "polychord";

pub fn input_names() -> EyreResult<Vec<String>> {
    let midi_in = MidiInput::new(CLIENT_NAME).wrap_err("failed to create MIDI input")?;
    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}

/// Connect every input (or those matching `filters`) to its own hub port.
///
/// A device that refuses the connection is logged and skipped. The returned
/// connections must be kept alive for input to keep flowing.
pub fn connect_inputs(
    hub: &MidiInputHub,
    filters: &[String],
) -> EyreResult<Vec<MidiInputConnection<()>>> {
    let names = input_names()?;
    let mut connections = Vec::new();

    for (index, name) in names.into_iter().enumerate() {
        info!("found MIDI device: {name}");
        if !filters.is_empty() && !filters.iter().any(|f| name.contains(f.as_str())) {
            continue;
        }

        // connect() consumes the client, so each device gets its own
        let midi_in = MidiInput::new(CLIENT_NAME).wrap_err("failed to create MIDI input")?;
        let ports = midi_in.ports();
        let Some(port) = ports.get(index) else {
            warn!("MIDI device {name} disappeared before connecting");
            continue;
        };

        let input = hub.open_port(name.clone());
        match midi_in.connect(
            port,
            "polychord-input",
            move |_stamp, message, _| {
                input.receive_bytes(message);
            },
            (),
        ) {
            Ok(connection) => {
                info!("enabled MIDI input: {name}");
                connections.push(connection);
            }
            Err(err) => warn!("failed to connect to {name}: {err}"),
        }
    }

    Ok(connections)
}
