use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use tracing::debug;
use traj_control::{FollowJointTrajectoryClient, GoalState, TrajectoryGoal};

use crate::{
    error::Error,
    msg::{
        actionlib_msgs::{GoalID, GoalStatusArray},
        control_msgs::{
            FollowJointTrajectoryActionGoal, FollowJointTrajectoryActionResult,
            FollowJointTrajectoryGoal,
        },
        trajectory_msgs::{JointTrajectory, JointTrajectoryPoint},
    },
    rosrust_utils::{convert_system_time_to_ros_time, SubscriberHandler},
};

const SERVER_POLLING_RATE: f64 = 10.0;

impl From<traj_control::TrajectoryPoint> for JointTrajectoryPoint {
    fn from(tp: traj_control::TrajectoryPoint) -> Self {
        Self {
            positions: tp.positions,
            velocities: tp.velocities,
            time_from_start: tp.time_from_start.into(),
            ..Default::default()
        }
    }
}

impl From<TrajectoryGoal> for FollowJointTrajectoryGoal {
    fn from(goal: TrajectoryGoal) -> Self {
        let mut trajectory = JointTrajectory {
            joint_names: goal.joint_names,
            points: goal.points.into_iter().map(Into::into).collect(),
            ..Default::default()
        };
        if let Some(start_time) = goal.start_time {
            trajectory.header.stamp = convert_system_time_to_ros_time(&start_time);
        }
        Self {
            trajectory,
            ..Default::default()
        }
    }
}

/// Follows one sent goal through the `result` and `status` topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalTracker {
    id: String,
    seen: bool,
}

impl GoalTracker {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            seen: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resolves the goal state from the latest result and status messages.
    ///
    /// A result for the goal wins over the status array. A goal that was
    /// listed in a status array and is missing from a later one, with no
    /// result received, is [`GoalState::Lost`].
    pub fn update(
        &mut self,
        result: Option<&FollowJointTrajectoryActionResult>,
        status: Option<&GoalStatusArray>,
    ) -> GoalState {
        if let Some(result) = result.filter(|r| r.status.goal_id.id == self.id) {
            return GoalState::from_status(result.status.status);
        }
        let Some(status) = status else {
            return GoalState::Pending;
        };
        match status.status_list.iter().find(|s| s.goal_id.id == self.id) {
            Some(s) => {
                self.seen = true;
                GoalState::from_status(s.status)
            }
            None if self.seen => GoalState::Lost,
            None => GoalState::Pending,
        }
    }
}

/// `control_msgs/FollowJointTrajectory` action client speaking the actionlib
/// topic protocol (`goal`, `cancel`, `status`, `result`).
pub struct RosFollowJointTrajectoryClient {
    server_name: String,
    goal_publisher: rosrust::Publisher<FollowJointTrajectoryActionGoal>,
    cancel_publisher: rosrust::Publisher<GoalID>,
    status_subscriber: SubscriberHandler<GoalStatusArray>,
    result_subscriber: SubscriberHandler<FollowJointTrajectoryActionResult>,
    goal: Mutex<Option<GoalTracker>>,
}

impl RosFollowJointTrajectoryClient {
    pub fn new(server_name: &str, queue_size: usize) -> Result<Self, Error> {
        let goal_topic = format!("{server_name}/goal");
        let cancel_topic = format!("{server_name}/cancel");
        let goal_publisher = rosrust::publish(&goal_topic, queue_size).map_err(|e| {
            Error::Advertise {
                topic: goal_topic.clone(),
                message: e.to_string(),
            }
        })?;
        let cancel_publisher = rosrust::publish(&cancel_topic, queue_size).map_err(|e| {
            Error::Advertise {
                topic: cancel_topic.clone(),
                message: e.to_string(),
            }
        })?;
        let status_subscriber =
            SubscriberHandler::new(&format!("{server_name}/status"), queue_size)?;
        let result_subscriber =
            SubscriberHandler::new(&format!("{server_name}/result"), queue_size)?;
        Ok(Self {
            server_name: server_name.to_owned(),
            goal_publisher,
            cancel_publisher,
            status_subscriber,
            result_subscriber,
            goal: Mutex::new(None),
        })
    }

    fn is_server_connected(&self) -> Result<bool, Error> {
        Ok(self.goal_publisher.subscriber_count() > 0
            && self.cancel_publisher.subscriber_count() > 0
            && self.status_subscriber.get()?.is_some())
    }

    /// Id of the last goal sent, if any.
    pub fn goal_id(&self) -> Option<String> {
        self.goal
            .lock()
            .ok()
            .and_then(|goal| goal.as_ref().map(|g| g.id().to_owned()))
    }
}

impl std::fmt::Debug for RosFollowJointTrajectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosFollowJointTrajectoryClient")
            .field("server_name", &self.server_name)
            .field("goal_id", &self.goal_id())
            .finish()
    }
}

impl FollowJointTrajectoryClient for RosFollowJointTrajectoryClient {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    fn wait_for_server(&self, timeout: Duration) -> bool {
        let rate = rosrust::rate(SERVER_POLLING_RATE);
        let start_time = Instant::now();
        while rosrust::is_ok() {
            match self.is_server_connected() {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    debug!("{e}");
                    return false;
                }
            }
            if start_time.elapsed() >= timeout {
                break;
            }
            rate.sleep();
        }
        false
    }

    fn send_goal(&self, goal: TrajectoryGoal) -> traj_control::Result<()> {
        let now = rosrust::now();
        let goal_id = format!("{}-{}", rosrust::name(), now.nanos());
        let mut action_goal = FollowJointTrajectoryActionGoal {
            goal: goal.into(),
            ..Default::default()
        };
        action_goal.header.stamp = now;
        action_goal.goal_id.stamp = now;
        action_goal.goal_id.id = goal_id.clone();
        if self.goal_publisher.send(action_goal).is_err() {
            return Err(Error::ActionGoalSendingFailure(self.server_name.clone()).into());
        }
        debug!("Sent goal {goal_id} to {}", self.server_name);
        let mut goal = self
            .goal
            .lock()
            .map_err(|_| Error::Lock(self.server_name.clone()))?;
        *goal = Some(GoalTracker::new(goal_id));
        Ok(())
    }

    fn goal_state(&self) -> GoalState {
        let Ok(mut goal) = self.goal.lock() else {
            return GoalState::Pending;
        };
        let Some(tracker) = goal.as_mut() else {
            return GoalState::Pending;
        };
        let result = self.result_subscriber.get().ok().flatten();
        let status = self.status_subscriber.get().ok().flatten();
        tracker.update(result.as_ref(), status.as_ref())
    }
}
