use auto_impl::auto_impl;

use crate::{error::Result, telemetry::TelemetrySubscription};

#[auto_impl(&, Box, Arc)]
pub trait TelemetrySource {
    /// Subscribes to a topic carrying `f64` arrays.
    ///
    /// At most `queue_size` messages are kept pending; older ones are dropped.
    fn subscribe(&self, topic: &str, queue_size: usize) -> Result<TelemetrySubscription>;
}
