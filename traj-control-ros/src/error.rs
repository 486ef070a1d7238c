use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("traj-control-ros: Failed to advertise {}: {}", topic, message)]
    Advertise { topic: String, message: String },
    #[error("traj-control-ros: Failed to subscribe {}: {}", topic, message)]
    Subscribe { topic: String, message: String },
    #[error("traj-control-ros: ActionGoalSendingFailure {}", .0)]
    ActionGoalSendingFailure(String),
    #[error("traj-control-ros: Failed to lock buffer for {}", .0)]
    Lock(String),
    #[error("traj-control-ros: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

impl From<Error> for traj_control::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::ActionGoalSendingFailure(name) => traj_control::Error::GoalSendingFailure(name),
            Error::Other(e) => traj_control::Error::Other(e),
            e => traj_control::Error::Connection {
                message: e.to_string(),
            },
        }
    }
}
