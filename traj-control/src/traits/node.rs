use crate::{
    error::Result,
    traits::{Clock, FollowJointTrajectoryClient, Liveness, TelemetrySource},
};

/// Everything the sequencer needs from a messaging backend.
pub trait Node: Clock + Liveness + TelemetrySource {
    type Client: FollowJointTrajectoryClient;

    /// Creates a client handle for `server_name`. The handle is not
    /// necessarily connected yet.
    fn action_client(&self, server_name: &str) -> Result<Self::Client>;
}
