// Purpose - MIDI message types and the input-to-audio hand-off

pub mod collector;
pub mod converter;
pub mod midi;

pub use collector::{event_collector, EventBlock, EventReceiver, EventSender, ScheduledEvent};
pub use midi::MidiEvent;
