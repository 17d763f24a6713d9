#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::io::collector::{EventBlock, EventReceiver, ScheduledEvent};

/// Where the render engine gets its events from each block.
pub trait EventSource: Send {
    /// Fill `block` with the events due in the next `num_frames` frames.
    fn drain_into(&mut self, num_frames: usize, block: &mut EventBlock);

    /// Called when the output device (re)starts.
    fn reset(&mut self, _sample_rate: f64) {}
}

impl EventSource for EventReceiver {
    fn drain_into(&mut self, num_frames: usize, block: &mut EventBlock) {
        self.drain(num_frames, block);
    }

    fn reset(&mut self, sample_rate: f64) {
        EventReceiver::reset(self, sample_rate);
    }
}

/// Pre-scheduled events from a single producer, e.g. a sequencer or an
/// offline bounce. Offsets are clamped into the block and kept monotonic.
#[cfg(feature = "rtrb")]
impl EventSource for Consumer<ScheduledEvent> {
    fn drain_into(&mut self, num_frames: usize, block: &mut EventBlock) {
        let last_frame = num_frames.saturating_sub(1) as u32;
        let mut floor = 0;

        while !block.is_full() {
            let Ok(mut scheduled) = self.pop() else {
                break;
            };
            scheduled.offset = scheduled.offset.min(last_frame).max(floor);
            floor = scheduled.offset;
            block.push(scheduled);
        }
    }
}
