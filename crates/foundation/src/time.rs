use serde::{Deserialize, Serialize};

/// Host clock value in milliseconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Self = Time(0.0);

    pub fn millis(&self) -> f64 {
        self.0
    }

    /// Milliseconds since `earlier`, never negative.
    pub fn elapsed_since(&self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn elapsed_is_clamped_at_zero() {
        assert_eq!(Time(1500.0).elapsed_since(Time(500.0)), 1000.0);
        assert_eq!(Time(100.0).elapsed_since(Time(250.0)), 0.0);
    }
}
