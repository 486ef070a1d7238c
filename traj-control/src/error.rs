use std::{path::PathBuf, time::Duration};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("traj-control: Timed-out waiting for valid time ({:?})", timeout)]
    ClockUnavailable { timeout: Duration },
    #[error(
        "traj-control: Action server {} is not available after {} attempts",
        name,
        attempts
    )]
    ServiceUnavailable { name: String, attempts: usize },
    #[error("traj-control: {} = {} is not a valid duration", name, value)]
    InvalidDuration { name: &'static str, value: f64 },
    #[error("traj-control: Shutdown requested")]
    ShutdownRequested,
    #[error("traj-control: Length mismatch (model = {}, input = {})", model, input)]
    LengthMismatch { model: usize, input: usize },
    #[error(
        "traj-control: time_from_start of point {} ({:?}) is not larger than the previous one ({:?})",
        index,
        current,
        previous
    )]
    NonIncreasingTimeFromStart {
        index: usize,
        previous: Duration,
        current: Duration,
    },
    #[error("traj-control: Failed to send goal to {}", .0)]
    GoalSendingFailure(String),
    #[error("traj-control: Connection error : {}", message)]
    Connection { message: String },
    #[error("traj-control: I/O error on {:?} : {}", path, source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("traj-control: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns `true` if this error is a cooperative exit rather than a failure.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Error::ShutdownRequested)
    }
}
