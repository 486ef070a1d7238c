mod error;
pub mod utils;

use std::{fmt, process::ExitCode};

use clap::ValueEnum;
use tracing::{debug, error, info, warn};
use traj_control::{DummyActionClient, DummyNode, GoalState, RunReport, TrajControlConfig};

pub use crate::error::*;

/// Messaging backend used to reach the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// ROS1 via rosrust.
    #[default]
    Ros,
    /// In-process fake robot. Nothing is sent anywhere.
    Dummy,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ros => f.write_str("ros"),
            Backend::Dummy => f.write_str("dummy"),
        }
    }
}

/// Runs the whole sequence on `backend`.
pub fn run(name: &str, backend: Backend, config: &TrajControlConfig) -> Result<RunReport, Error> {
    debug!("run {name} on {backend} with {config:?}");
    match backend {
        #[cfg(feature = "ros")]
        Backend::Ros => {
            let node = traj_control_ros::RosNode::init(name);
            Ok(traj_control::run(&node, config)?)
        }
        #[cfg(not(feature = "ros"))]
        Backend::Ros => Err(Error::BackendRequireFeature(backend.to_string())),
        Backend::Dummy => {
            let node = dummy_node(config)?;
            Ok(traj_control::run(&node, config)?)
        }
    }
}

/// A fake robot that finishes the trajectory after its nominal duration.
pub fn dummy_node(config: &TrajControlConfig) -> Result<DummyNode, Error> {
    let duration = traj_control::waypoints_arm_goal()
        .duration()
        .checked_add(config.start_delay()?)
        .ok_or(traj_control::Error::InvalidDuration {
            name: "start_delay_sec",
            value: config.start_delay_sec,
        })?;
    let polls = if config.spin_period()?.is_zero() {
        0
    } else {
        (duration.as_secs_f64() * config.spin_rate).ceil() as usize
    };
    Ok(DummyNode::new(
        DummyActionClient::new("").with_done_after(polls, GoalState::Succeeded),
    ))
}

/// Logs the outcome of [`run`] and maps it to the process exit status.
pub fn report_exit_code(result: &Result<RunReport, Error>) -> ExitCode {
    ExitCode::from(report_exit_status(result))
}

/// Same as [`report_exit_code`] but returns the raw status.
pub fn report_exit_status(result: &Result<RunReport, Error>) -> u8 {
    match result {
        Ok(report) => {
            if report.position_error_dropped + report.torques_dropped > 0 {
                warn!(
                    "Dropped telemetry: position_error = {}, torques = {}",
                    report.position_error_dropped, report.torques_dropped
                );
            }
            info!(
                "Recorded {} position_error and {} torques messages",
                report.position_error_count, report.torques_count
            );
            0
        }
        Err(e) => {
            error!("{e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use traj_control::FollowJointTrajectoryClient;

    use super::*;

    #[test]
    fn test_dummy_node_duration() {
        let config = TrajControlConfig {
            spin_rate: 10.0,
            ..Default::default()
        };
        let node = dummy_node(&config).unwrap();
        assert_eq!(node.client().probe_count(), 0);
        // (17 s + 1 s) * 10 Hz
        let mut polls = 0;
        node.client()
            .send_goal(traj_control::waypoints_arm_goal())
            .unwrap();
        while !node.client().goal_state().is_done() {
            polls += 1;
        }
        assert_eq!(polls, 180);
    }

    #[test]
    fn test_dummy_node_invalid_start_delay() {
        let config = TrajControlConfig {
            start_delay_sec: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            dummy_node(&config),
            Err(Error::TrajControl(traj_control::Error::InvalidDuration { .. }))
        ));
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Ros.to_string(), "ros");
        assert_eq!(Backend::Dummy.to_string(), "dummy");
        assert_eq!(Backend::default(), Backend::Ros);
    }
}
