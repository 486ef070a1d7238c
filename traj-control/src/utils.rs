use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Converts a configured number of seconds named `name` into a [`Duration`].
///
/// Negative, non-finite and overflowing values are rejected.
pub fn duration_from_secs(name: &'static str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| Error::InvalidDuration { name, value: secs })
}

/// Fixed-frequency loop pacing.
///
/// # Example
/// ```
/// let mut rate = traj_control::Rate::new(100.0).unwrap();
/// let now = std::time::Instant::now();
/// rate.sleep();
/// rate.sleep();
/// assert!(now.elapsed() >= std::time::Duration::from_millis(15));
/// ```
#[derive(Debug)]
pub struct Rate {
    period: Duration,
    target_time: Instant,
}

impl Rate {
    /// Creates a rate running at `frequency` Hz. Non-positive values disable sleeping.
    pub fn new(frequency: f64) -> Result<Self> {
        let period = if frequency > 0.0 {
            Duration::try_from_secs_f64(frequency.recip()).map_err(|_| Error::InvalidDuration {
                name: "rate period",
                value: frequency.recip(),
            })?
        } else {
            Duration::ZERO
        };
        Ok(Self::from_period(period))
    }

    pub fn from_period(period: Duration) -> Self {
        let now = Instant::now();
        Self {
            period,
            target_time: now.checked_add(period).unwrap_or(now),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until one period after the previous wake-up.
    ///
    /// If the loop body overran, the schedule restarts from now instead of
    /// trying to catch up.
    pub fn sleep(&mut self) {
        let now = Instant::now();
        if now < self.target_time {
            std::thread::sleep(self.target_time - now);
            self.target_time = self
                .target_time
                .checked_add(self.period)
                .unwrap_or(self.target_time);
        } else {
            self.target_time = now.checked_add(self.period).unwrap_or(now);
        }
    }
}
