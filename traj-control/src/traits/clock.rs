use std::time::{Duration, SystemTime};

use auto_impl::auto_impl;

#[auto_impl(&, Box, Arc)]
pub trait Clock {
    /// Current time of the robot's time source. This may be simulated time.
    fn now(&self) -> SystemTime;

    /// Blocks up to `timeout` (wall time) until the time source publishes a
    /// non-zero time. Returns `false` on timeout.
    fn wait_for_valid(&self, timeout: Duration) -> bool;
}
