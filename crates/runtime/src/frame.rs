use foundation::time::Time;
use serde::Serialize;

/// Metadata for one rendered frame.
///
/// Produced by [`AnimationClock::tick`](crate::AnimationClock::tick); every
/// time-dependent effect in the frame is evaluated against `time`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    /// Number of ticks accepted so far (0 before the first tick).
    pub index: u64,
    /// Clock time of the frame (milliseconds).
    pub time: Time,
    /// Time advanced since the previous frame (milliseconds).
    pub dt_ms: f64,
}

impl Frame {
    pub fn new(index: u64, time: Time, dt_ms: f64) -> Self {
        Self { index, time, dt_ms }
    }

    /// Frame following `self` at `time`.
    pub fn advance(self, time: Time) -> Self {
        Self::new(self.index + 1, time, time.elapsed_since(self.time))
    }
}
