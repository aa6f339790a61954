//! Shared animation clock.
//!
//! The host calls [`AnimationClock::tick`] once per rendered frame with its
//! frame timestamp. The clock only records that value; effects read it and
//! evaluate their own formulas, so ticking costs the same no matter how many
//! entities exist.

use foundation::time::Time;
use tracing::warn;

use crate::frame::Frame;

/// Monotonic frame clock driven by host timestamps (milliseconds).
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    frame: Frame,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `start` instead of zero.
    pub fn starting_at(start: Time) -> Self {
        Self {
            frame: Frame::new(0, start, 0.0),
        }
    }

    /// Current clock time.
    pub fn now(&self) -> Time {
        self.frame.time
    }

    /// The most recent frame.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Advances to `timestamp_ms`.
    ///
    /// The clock never rewinds: a timestamp that is earlier than the current
    /// time, or not finite, still produces a frame but keeps the current time.
    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let now = self.frame.time;
        let next = if timestamp_ms.is_finite() && timestamp_ms >= now.0 {
            Time(timestamp_ms)
        } else {
            warn!(
                timestamp_ms,
                now_ms = now.0,
                "ignoring non-monotonic frame timestamp"
            );
            now
        };

        self.frame = self.frame.advance(next);
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationClock;
    use foundation::time::Time;

    #[test]
    fn starts_at_zero() {
        let clock = AnimationClock::new();
        assert_eq!(clock.now(), Time::ZERO);
        assert_eq!(clock.frame().index, 0);
    }

    #[test]
    fn tick_advances_time_and_frame_index() {
        let mut clock = AnimationClock::new();
        let f = clock.tick(16.5);
        assert_eq!(f.index, 1);
        assert_eq!(f.time, Time(16.5));
        assert_eq!(f.dt_ms, 16.5);

        let f = clock.tick(33.0);
        assert_eq!(f.index, 2);
        assert_eq!(clock.now(), Time(33.0));
    }

    #[test]
    fn never_rewinds() {
        let mut clock = AnimationClock::starting_at(Time(1000.0));
        clock.tick(1200.0);
        let f = clock.tick(900.0);
        assert_eq!(f.time, Time(1200.0));
        assert_eq!(f.dt_ms, 0.0);
        assert_eq!(f.index, 2);

        clock.tick(f64::NAN);
        assert_eq!(clock.now(), Time(1200.0));
    }

    #[test]
    fn repeated_timestamp_is_accepted() {
        let mut clock = AnimationClock::new();
        clock.tick(50.0);
        let f = clock.tick(50.0);
        assert_eq!(f.time, Time(50.0));
        assert_eq!(f.dt_ms, 0.0);
    }
}
