use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    traits::{FollowJointTrajectoryClient, Liveness},
    utils::duration_from_secs,
};

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Number of `wait_for_server` probes before giving up.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// How long a single probe waits for the server.
    #[serde(default = "default_wait_timeout_sec")]
    pub wait_timeout_sec: f64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            wait_timeout_sec: default_wait_timeout_sec(),
        }
    }
}

impl ConnectorConfig {
    pub fn wait_timeout(&self) -> Result<Duration> {
        duration_from_secs("wait_timeout_sec", self.wait_timeout_sec)
    }
}

const fn default_max_iterations() -> usize {
    3
}

const fn default_wait_timeout_sec() -> f64 {
    2.0
}

/// Probes `client` until its action server is ready.
///
/// Fails with [`Error::ServiceUnavailable`] when all `max_iterations` probes
/// time out, or with [`Error::ShutdownRequested`] if `liveness` ends first.
pub fn connect<C, L>(client: C, liveness: &L, config: &ConnectorConfig) -> Result<C>
where
    C: FollowJointTrajectoryClient,
    L: Liveness + ?Sized,
{
    let timeout = config.wait_timeout()?;
    info!("Creating action client to {} ...", client.server_name());
    for attempt in 1..=config.max_iterations {
        if !liveness.is_ok() {
            return Err(Error::ShutdownRequested);
        }
        if client.wait_for_server(timeout) {
            debug!(
                "Action server {} is ready (attempt {attempt})",
                client.server_name()
            );
            return Ok(client);
        }
        debug!(
            "Waiting for the action server {} to come up ({attempt}/{})",
            client.server_name(),
            config.max_iterations
        );
    }
    Err(Error::ServiceUnavailable {
        name: client.server_name().to_owned(),
        attempts: config.max_iterations,
    })
}
