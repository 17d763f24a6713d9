// Purpose: Voice management and polyphony
// This layer turns note events into summed sine voices

pub mod message;
pub mod poly;
pub mod voice;

pub use message::EventSource;
pub use poly::{VoicePool, VoiceStealing};
pub use voice::{Voice, VoiceState};
