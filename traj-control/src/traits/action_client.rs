use std::time::Duration;

use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::{error::Result, goal::TrajectoryGoal};

/// State of a goal as reported by an action server.
///
/// The variants and their numeric codes follow `actionlib_msgs/GoalStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalState {
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
    Preempting,
    Recalling,
    Recalled,
    Lost,
}

impl GoalState {
    /// Converts a raw `actionlib_msgs/GoalStatus` code. Unknown codes map to `Lost`.
    pub fn from_status(status: u8) -> Self {
        match status {
            0 => GoalState::Pending,
            1 => GoalState::Active,
            2 => GoalState::Preempted,
            3 => GoalState::Succeeded,
            4 => GoalState::Aborted,
            5 => GoalState::Rejected,
            6 => GoalState::Preempting,
            7 => GoalState::Recalling,
            8 => GoalState::Recalled,
            _ => GoalState::Lost,
        }
    }

    /// Returns `true` once the server will not report further progress on the goal.
    pub fn is_done(self) -> bool {
        matches!(
            self,
            GoalState::Preempted
                | GoalState::Succeeded
                | GoalState::Aborted
                | GoalState::Rejected
                | GoalState::Recalled
                | GoalState::Lost
        )
    }
}

#[auto_impl(&, Box, Arc)]
pub trait FollowJointTrajectoryClient {
    /// Name of the action server this client talks to.
    fn server_name(&self) -> &str;

    /// Blocks up to `timeout` until the action server is connected.
    ///
    /// Returns `false` if the server did not come up in time.
    fn wait_for_server(&self, timeout: Duration) -> bool;

    /// Submits `goal` without waiting for its result.
    fn send_goal(&self, goal: TrajectoryGoal) -> Result<()>;

    /// Latest known state of the last submitted goal.
    fn goal_state(&self) -> GoalState;
}
