//! Session command channel
//!
//! Input surfaces (pad, UI) push commands through a lock-free SPSC ring
//! buffer; the session loop drains it each tick. If the buffer fills,
//! the newest command is dropped - stale control input is worth less
//! than a blocked input thread.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::types::{ControlAxis, SourceHandle};

/// Commands accepted by the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Load new material onto both tracks
    LoadSource(SourceHandle),
    /// Set effective tempo in BPM
    SetCurrentBpm(f64),
    /// Jump to a tempo ratio relative to the base (0.5, 1.0, 2.0 ...)
    ApplyTempoRatio(f64),
    /// Move the crossfader to an absolute position
    SetCrossfade(f32),
    /// Chop pad pressed
    ChopPress,
    /// Chop pad released
    ChopRelease,
    /// Continuous controller axis moved
    Axis { axis: ControlAxis, value: f32 },
    /// Start the transport
    Start,
    /// Stop the transport
    Stop,
}

/// Default command queue depth. Deep enough for a burst of axis events
/// between two ticks.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Create the SPSC command channel between input and session.
pub fn command_channel(capacity: usize) -> (Producer<SessionCommand>, Consumer<SessionCommand>) {
    RingBuffer::new(capacity)
}

/// Push a command, dropping it (with a log line) if the queue is full.
pub fn send_command(producer: &mut Producer<SessionCommand>, command: SessionCommand) {
    if let Err(e) = producer.push(command) {
        log::warn!("command queue full, dropping {:?}", e);
    }
}
